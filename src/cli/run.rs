//! Run command implementation

use crate::api::{create_router, AppState};
use crate::cli::RunArgs;
use crate::config::{LogFormat, PingkeeperConfig, ReportConfig};
use crate::pinger::{PingError, Pinger};
use crate::reporter::Reporter;
use chrono::Utc;
use colored::Colorize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &RunArgs,
) -> Result<PingkeeperConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        PingkeeperConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        PingkeeperConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(interval) = args.interval {
        config.pinger.interval_ms = interval;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_server {
        config.server.enabled = false;
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Build filter directives using helper function
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Build the reporter from config, if reporting is usable.
pub fn build_reporter(config: &ReportConfig) -> Option<Reporter> {
    let url = config.url.as_ref()?;
    match config.resolve_api_key() {
        Some(api_key) => Some(Reporter::new(url.clone(), api_key)),
        None => {
            tracing::warn!("report URL configured but no API key resolved; reporting disabled");
            None
        }
    }
}

/// Build the pinger from config and register all endpoint sources.
pub fn build_pinger(config: &PingkeeperConfig, extra_urls: &[String]) -> Pinger {
    let mut pinger = Pinger::new(config.pinger.clone());

    if let Some(reporter) = build_reporter(&config.report) {
        pinger = pinger.with_reporter(reporter);
    }

    let pinger = pinger
        .with_on_success(print_success)
        .with_on_error(print_failure);

    for endpoint in &config.endpoints {
        pinger.register(endpoint.url.clone());
    }
    pinger.register_many(extra_urls.iter().cloned());
    pinger.register_from_env();

    pinger
}

/// One line per successful ping, for the interactive use case.
fn print_success(url: &str, response_time_ms: u64) {
    println!(
        "{}",
        format!(
            "✓ [{}] {} ({}ms)",
            Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            url,
            response_time_ms
        )
        .green()
    );
}

/// One clearly marked line per failed ping; the loop keeps going.
fn print_failure(error: &PingError, url: &str) {
    println!(
        "{}",
        format!(
            "✗ [{}] {}: {}",
            Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            url,
            error
        )
        .red()
    );
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main run command handler
pub async fn handle_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;

    // Validate configuration
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting pingkeeper");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Build the pinger and register endpoints from all sources
    let pinger = build_pinger(&config, &args.urls);

    if pinger.endpoint_count() == 0 {
        if !config.server.enabled {
            return Err("no endpoints registered and the status server is disabled".into());
        }
        tracing::warn!("no endpoints registered; only the status server will run");
    }

    // 4. Start the ping service (no-op when nothing is registered)
    pinger.start();

    // 5. Serve the HTTP surface, or just wait for a signal
    let cancel_token = CancellationToken::new();
    if config.server.enabled {
        let state = Arc::new(AppState::new(pinger.clone()));
        let app = create_router(state);

        let addr = format!("{}:{}", config.server.host, config.server.port);
        tracing::info!(addr = %addr, "pingkeeper status server listening");

        let listener = tokio::net::TcpListener::bind(&addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
            .await?;
    } else {
        shutdown_signal(cancel_token.clone()).await;
    }

    // 6. Cleanup
    if let Some(handle) = pinger.stop() {
        tracing::info!("Waiting for ping service to stop");
        handle.await?;
    }

    tracing::info!("pingkeeper stopped");
    Ok(())
}
