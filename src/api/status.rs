//! Status endpoint handler.

use crate::api::AppState;
use crate::pinger::{EndpointStatsView, PingerStatus};
use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Status response: service state plus rolling per-endpoint stats.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub uptime_seconds: u64,
    #[serde(flatten)]
    pub pinger: PingerStatus,
    pub stats: BTreeMap<String, EndpointStatsView>,
}

/// GET /status - current ping service state.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        uptime_seconds: state.start_time.elapsed().as_secs(),
        pinger: state.pinger.status(),
        stats: state.pinger.stats(),
    })
}
