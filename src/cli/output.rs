//! Output formatting helpers for CLI commands

use crate::pinger::PingResult;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;
use std::collections::BTreeMap;

/// Format probe results as a table
pub fn format_results_table(results: &BTreeMap<String, PingResult>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Endpoint", "Result", "Status", "Time", "Detail"]);

    for (url, result) in results {
        let (outcome, detail) = if result.is_up() {
            ("Up".green().to_string(), String::new())
        } else if result.status == 0 {
            (
                "Down".red().to_string(),
                result.error.clone().unwrap_or_default(),
            )
        } else {
            ("Down".red().to_string(), format!("HTTP {}", result.status))
        };

        table.add_row(vec![
            Cell::new(url),
            Cell::new(outcome),
            Cell::new(result.status),
            Cell::new(format!("{}ms", result.response_time_ms)),
            Cell::new(detail),
        ]);
    }

    table.to_string()
}

/// Format probe results as JSON
pub fn format_results_json(
    results: &BTreeMap<String, PingResult>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "results": results
    }))
}
