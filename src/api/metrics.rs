//! Prometheus metrics export.

use crate::api::AppState;
use axum::extract::State;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;

/// Install the global Prometheus recorder and return its render handle.
pub fn setup_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// GET /metrics - render Prometheus text format.
pub async fn handle(State(state): State<Arc<AppState>>) -> String {
    state.prometheus_handle.render()
}
