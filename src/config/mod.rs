//! Configuration module for pingkeeper
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PINGKEEPER_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use pingkeeper::config::PingkeeperConfig;
//!
//! // Load defaults
//! let config = PingkeeperConfig::default();
//! assert_eq!(config.pinger.interval_ms, 300_000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [pinger]
//! interval_ms = 60000
//! "#;
//! let config: PingkeeperConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.pinger.interval_ms, 60_000);
//! ```

pub mod endpoint;
pub mod error;
pub mod logging;
pub mod report;
pub mod server;

pub use endpoint::EndpointConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use report::ReportConfig;
pub use server::ServerConfig;

// Re-export PingerConfig from the pinger module
pub use crate::pinger::PingerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for pingkeeper.
///
/// Aggregates all configuration sections: the status server, the ping
/// service itself, the report sink, static endpoints, and logging.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PingkeeperConfig {
    /// HTTP status server configuration
    pub server: ServerConfig,
    /// Ping service configuration
    pub pinger: PingerConfig,
    /// Report sink settings
    pub report: ReportConfig,
    /// Static endpoint definitions
    pub endpoints: Vec<EndpointConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl PingkeeperConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports PINGKEEPER_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Server settings
        if let Ok(port) = std::env::var("PINGKEEPER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("PINGKEEPER_HOST") {
            self.server.host = host;
        }

        // Pinger settings
        if let Ok(interval) = std::env::var("PINGKEEPER_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.pinger.interval_ms = ms;
            }
        }

        // Report settings
        if let Ok(key) = std::env::var("PINGKEEPER_API_KEY") {
            if !key.is_empty() {
                self.report.api_key = Some(key);
            }
        }

        // Logging settings
        if let Ok(level) = std::env::var("PINGKEEPER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PINGKEEPER_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.enabled && self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        if self.pinger.interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "pinger.interval_ms".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.pinger.timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "pinger.timeout_ms".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            if endpoint.url.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("endpoints[{}].url", i),
                    message: "URL cannot be empty".to_string(),
                });
            }
        }

        // A report URL without any key source is a misconfiguration the
        // user should hear about at startup, not per report attempt.
        if self.report.url.is_some()
            && self.report.api_key.is_none()
            && self.report.api_key_env.is_none()
        {
            return Err(ConfigError::Validation {
                field: "report.api_key".to_string(),
                message: "report URL configured without api_key or api_key_env".to_string(),
            });
        }

        Ok(())
    }
}
