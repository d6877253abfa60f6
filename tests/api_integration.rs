//! Integration tests for the HTTP status surface.

use pingkeeper::api::{create_router, AppState};
use pingkeeper::pinger::{Pinger, PingerConfig};
use std::sync::Arc;

/// Serve the router on an ephemeral port and return its base URL.
async fn serve_api(pinger: Pinger) -> String {
    let state = Arc::new(AppState::new(pinger));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_ping_route_returns_ok() {
    let base = serve_api(Pinger::new(PingerConfig::default())).await;

    let response = reqwest::get(format!("{}/ping", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_status_route_reflects_pinger_state() {
    let pinger = Pinger::new(PingerConfig {
        interval_ms: 60_000,
        ..PingerConfig::default()
    });
    pinger.register("https://a.example.com/health");

    let base = serve_api(pinger).await;

    let response = reqwest::get(format!("{}/status", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["is_active"], false);
    assert_eq!(body["interval_ms"], 60_000);
    assert_eq!(body["endpoints"][0], "https://a.example.com/health");
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_status_route_includes_last_results() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let pinger = Pinger::new(PingerConfig::default());
    pinger.register(mock_server.uri());
    pinger.probe_all().await;

    let base = serve_api(pinger).await;

    let body: serde_json::Value = reqwest::get(format!("{}/status", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let result = &body["last_results"][mock_server.uri()];
    assert_eq!(result["status"], 200);
    assert!(body["stats"][mock_server.uri()]["total_probes"].is_number());
}

#[tokio::test]
async fn test_metrics_route_renders_prometheus_text() {
    let base = serve_api(Pinger::new(PingerConfig::default())).await;

    let response = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    // Body may be empty before any samples; the route itself must work
    response.text().await.unwrap();
}
