//! Report sink configuration

use serde::{Deserialize, Serialize};

/// Configuration for forwarding results to a remote metrics sink.
///
/// Reporting is enabled when `url` is set together with a resolvable API
/// key. The key can be given inline or, preferably, as the name of an
/// environment variable via `api_key_env`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
}

impl ReportConfig {
    /// Resolve the API key: inline value first, then the named env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        self.api_key_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_defaults() {
        let config = ReportConfig::default();
        assert!(config.url.is_none());
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_resolve_api_key_inline_wins() {
        let config = ReportConfig {
            url: Some("https://metrics.example.com/v1/ping".to_string()),
            api_key: Some("inline-key".to_string()),
            api_key_env: Some("PINGKEEPER_TEST_KEY_UNSET".to_string()),
        };
        assert_eq!(config.resolve_api_key().unwrap(), "inline-key");
    }

    #[test]
    fn test_resolve_api_key_from_env() {
        std::env::set_var("PINGKEEPER_TEST_REPORT_KEY", "env-key");
        let config = ReportConfig {
            url: None,
            api_key: None,
            api_key_env: Some("PINGKEEPER_TEST_REPORT_KEY".to_string()),
        };
        let key = config.resolve_api_key();
        std::env::remove_var("PINGKEEPER_TEST_REPORT_KEY");

        assert_eq!(key.unwrap(), "env-key");
    }

    #[test]
    fn test_resolve_api_key_missing_env() {
        let config = ReportConfig {
            url: None,
            api_key: None,
            api_key_env: Some("PINGKEEPER_TEST_KEY_DEFINITELY_UNSET".to_string()),
        };
        assert!(config.resolve_api_key().is_none());
    }
}
