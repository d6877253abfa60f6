//! Probe result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one logical probe. Retries are folded in; only the final
/// attempt is visible here.
///
/// `status` is the HTTP status code of the response, or 0 when no response
/// was obtained at all (timeout, connection failure). `error` is set exactly
/// when `status == 0`; a received error status (4xx/5xx) is a completed
/// probe, not a failure, and carries no error string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    /// HTTP status code, or 0 for "no response obtained"
    pub status: u16,
    /// Wall-clock time from request start to response or failure
    pub response_time_ms: u64,
    /// When the attempt completed
    pub timestamp: DateTime<Utc>,
    /// Failure description, present only when `status == 0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PingResult {
    /// Result for a completed HTTP exchange, whatever the status code.
    pub fn responded(status: u16, response_time_ms: u64) -> Self {
        Self {
            status,
            response_time_ms,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// Result for a probe that obtained no response.
    pub fn failed(error: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status: 0,
            response_time_ms,
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }

    /// Uptime classification: a probe counts as up iff the status is in
    /// [200, 400). Redirects keep a sleeping backend awake just as well as
    /// a 200 does.
    pub fn is_up(&self) -> bool {
        (200..400).contains(&self.status)
    }
}
