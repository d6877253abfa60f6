//! Error types for probing.

use thiserror::Error;

/// Failure modes of a single probe attempt.
#[derive(Debug, Clone, Error)]
pub enum PingError {
    /// Request timeout
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Connection failed (refused, reset, DNS miss)
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be constructed, e.g. an invalid URL
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Endpoint answered with a non-success status
    #[error("ping failed with HTTP status {0}")]
    HttpStatus(u16),
}

impl PingError {
    /// Transport-level failures are retried; a received HTTP response never
    /// is, and neither is a request that cannot be built in the first place.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PingError::Timeout(_) | PingError::ConnectionFailed(_)
        )
    }
}
