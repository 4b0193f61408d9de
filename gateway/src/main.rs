// gateway/src/main.rs

//! Upgrade gateway binary.
//!
//! This binary exposes a small HTTP API on top of the `upgrade-monitor`
//! crate:
//!
//! - `GET /health`
//! - `GET /upgrade` (on-demand gRPC query, JSON snapshot)
//! - `GET /metrics` (Prometheus gauges refreshed by a background poller)

mod config;
mod routes;
mod state;

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use config::Cli;
use state::{AppState, SharedState};
use upgrade_monitor::{GrpcConnector, MetricsRegistry, Poller, SignalConnector};

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "upgrade_gateway=info,upgrade_monitor=info".to_string()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let (api_cfg, monitor_cfg) = cli
        .into_configs()
        .map_err(|e| format!("invalid configuration: {e}"))?;

    tracing::info!(
        "connecting to gRPC server at: {} (TLS: {})",
        monitor_cfg.endpoint.authority(),
        monitor_cfg.endpoint.secure
    );

    // ---------------------------
    // Metrics + remote client
    // ---------------------------

    let metrics = Arc::new(
        MetricsRegistry::new()
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    let connector: Arc<dyn SignalConnector> = Arc::new(GrpcConnector::new(
        monitor_cfg.endpoint.clone(),
        monitor_cfg.query_timeout,
    ));

    // ---------------------------
    // Background poller
    // ---------------------------

    let shutdown = CancellationToken::new();
    let poller = Poller::new(connector.clone(), metrics.clone(), &monitor_cfg);
    let poller_handle = poller.spawn(shutdown.clone());

    // ---------------------------
    // HTTP router
    // ---------------------------

    let app_state: SharedState = Arc::new(AppState {
        connector,
        metrics,
        query_timeout: monitor_cfg.query_timeout,
    });
    let app = routes::router(app_state);

    tracing::info!("HTTP server listening on http://{}", api_cfg.listen_addr);

    let listener = tokio::net::TcpListener::bind(api_cfg.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", api_cfg.listen_addr))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .map_err(|e| format!("HTTP server error: {e}"));

    // Stop the poller whichever way the server exited.
    shutdown.cancel();
    if let Err(e) = poller_handle.await {
        tracing::warn!("poller task ended abnormally: {e}");
    }

    served
}

/// Waits for Ctrl-C, then cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    // Wait for Ctrl+C
    if let Err(e) = signal::ctrl_c().await {
        // Without a handler the server keeps running until killed.
        tracing::error!("failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
    shutdown.cancel();
}
