//! Liveness endpoint handler.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Liveness payload returned to upstream pingers.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// GET /ping - confirm the service is up.
pub async fn handle() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "pingkeeper: service is up and running".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_payload() {
        let Json(response) = handle().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }
}
