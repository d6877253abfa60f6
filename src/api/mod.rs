//! HTTP surface for the ping service.
//!
//! The deployment story for a keep-alive pinger is a tiny route the host
//! exposes for other pingers, plus a window into the service's own state.
//! This module is that adapter layer:
//!
//! - `GET /ping` - liveness payload for upstream pingers
//! - `GET /status` - current service state and per-endpoint stats
//! - `GET /metrics` - Prometheus text format
//!
//! # Example
//!
//! ```no_run
//! use pingkeeper::api::{create_router, AppState};
//! use pingkeeper::pinger::{Pinger, PingerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pinger = Pinger::new(PingerConfig::default());
//! let state = Arc::new(AppState::new(pinger));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8088").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod metrics;
mod ping;
mod status;

pub use metrics::setup_metrics;

use crate::pinger::Pinger;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub pinger: Pinger,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Prometheus handle for rendering metrics
    pub prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl AppState {
    /// Create new application state around a pinger handle.
    pub fn new(pinger: Pinger) -> Self {
        // Initialize metrics (safe to call multiple times - will reuse
        // existing if already set)
        let prometheus_handle = setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });

        Self {
            pinger,
            start_time: Instant::now(),
            prometheus_handle,
        }
    }
}

/// Create the router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping::handle))
        .route("/status", get(status::handle))
        .route("/metrics", get(metrics::handle))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
