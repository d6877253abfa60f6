//! Probe command implementation

use crate::cli::output;
use crate::cli::ProbeArgs;
use crate::pinger::{Pinger, PingerConfig};

/// Handle `pingkeeper probe` - one-shot probe of the given endpoints.
///
/// A down endpoint is reported in the output, not as a process failure;
/// the command only errors on usage problems.
pub async fn handle_probe(args: &ProbeArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = PingerConfig {
        method: args.method,
        timeout_ms: args.timeout_ms,
        retry_count: args.retry_count,
        ..PingerConfig::default()
    };

    let pinger = Pinger::new(config);
    pinger.register_many(args.urls.iter().cloned());

    let results = pinger.probe_all().await;

    if args.json {
        Ok(output::format_results_json(&results)?)
    } else {
        Ok(output::format_results_table(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_args(urls: Vec<String>) -> ProbeArgs {
        ProbeArgs {
            urls,
            method: crate::pinger::ProbeMethod::Get,
            timeout_ms: 1_000,
            retry_count: 0,
            json: false,
        }
    }

    #[tokio::test]
    async fn test_probe_unreachable_endpoint_reports_down() {
        // Bind then drop to find a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let args = probe_args(vec![format!("http://127.0.0.1:{}/", port)]);
        let output = handle_probe(&args).await.unwrap();

        assert!(output.contains("Down"));
    }

    #[tokio::test]
    async fn test_probe_json_output_shape() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut args = probe_args(vec![format!("http://127.0.0.1:{}/", port)]);
        args.json = true;

        let output = handle_probe(&args).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let result = &parsed["results"][format!("http://127.0.0.1:{}/", port)];
        assert_eq!(result["status"], 0);
        assert!(result["error"].as_str().unwrap().len() > 0);
    }
}
