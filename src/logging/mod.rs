//! Structured logging helpers.
//!
//! Tracing setup lives in the CLI (`cli::run::init_tracing`); this module
//! holds the pieces shared with tests and other entry points.

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use pingkeeper::config::{LogFormat, LoggingConfig};
/// use pingkeeper::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("pinger".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,pingkeeper::pinger=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",pingkeeper::{}={}", component, level));
        }
    }

    filter_str
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;

    #[test]
    fn test_filter_base_level_only() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..Default::default()
        };
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_with_component_level() {
        let mut levels = std::collections::HashMap::new();
        levels.insert("api".to_string(), "trace".to_string());

        let config = LoggingConfig {
            level: "info".to_string(),
            component_levels: Some(levels),
            ..Default::default()
        };
        assert_eq!(build_filter_directives(&config), "info,pingkeeper::api=trace");
    }
}
