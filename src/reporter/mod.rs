//! Best-effort forwarding of probe results to a remote metrics sink.
//!
//! Reporting is fire-and-forget: a failed report is logged and discarded,
//! and can never affect the probe's own classification, retries, or
//! callbacks.

use crate::pinger::PingResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors from one report attempt. Logged, never propagated.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Transport error talking to the sink
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Sink answered with a non-2xx status
    #[error("sink rejected report: HTTP {0}")]
    Rejected(u16),
}

/// Wire payload accepted by the metrics sink.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub endpoint: String,
    pub status: u16,
    pub response_time: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fire-and-forget client for the report sink.
#[derive(Debug, Clone)]
pub struct Reporter {
    client: reqwest::Client,
    report_url: String,
    api_key: String,
}

impl Reporter {
    /// Create a reporter with a default HTTP client.
    pub fn new(report_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pingkeeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client, report_url, api_key)
    }

    /// Create a reporter with a custom HTTP client (for testing).
    pub fn with_client(
        client: reqwest::Client,
        report_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            report_url: report_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Queue a report for `result` on a detached task.
    pub fn report(&self, endpoint: &str, result: &PingResult) {
        let reporter = self.clone();
        let payload = ReportPayload {
            endpoint: endpoint.to_string(),
            status: result.status,
            response_time: result.response_time_ms,
            timestamp: result.timestamp,
            error: result.error.clone(),
        };

        tokio::spawn(async move {
            if let Err(e) = reporter.send(&payload).await {
                tracing::warn!(
                    endpoint = %payload.endpoint,
                    error = %e,
                    "failed to report ping result"
                );
            }
        });
    }

    /// Post one payload to the sink.
    async fn send(&self, payload: &ReportPayload) -> Result<(), ReportError> {
        let response = self
            .client
            .post(&self.report_url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinger::PingResult;

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = ReportPayload {
            endpoint: "https://example.com".to_string(),
            status: 200,
            response_time: 42,
            timestamp: Utc::now(),
            error: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["endpoint"], "https://example.com");
        assert_eq!(json["status"], 200);
        assert_eq!(json["responseTime"], 42);
        assert!(json.get("timestamp").is_some());
        // Omitted entirely when unset
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_payload_includes_error_when_set() {
        let payload = ReportPayload {
            endpoint: "https://example.com".to_string(),
            status: 0,
            response_time: 10,
            timestamp: Utc::now(),
            error: Some("connection failed: refused".to_string()),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["error"], "connection failed: refused");
    }

    #[test]
    fn test_payload_timestamp_is_iso8601() {
        let result = PingResult::responded(200, 5);
        let payload = ReportPayload {
            endpoint: "https://example.com".to_string(),
            status: result.status,
            response_time: result.response_time_ms,
            timestamp: result.timestamp,
            error: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'));
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
