//! peer-lobby server entry point.
//!
//! Starts the match engine, its retry scheduler, and the Axum HTTP server
//! with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use peer_lobby::app_state::AppState;
use peer_lobby::build_app;
use peer_lobby::config::{LobbyConfig, LogFormat};
use peer_lobby::domain::EventBus;
use peer_lobby::service::{MatchEngine, RetryScheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = LobbyConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting peer-lobby");

    // Bind before the sweep timer starts
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;

    // Build engine and its single sweep timer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let engine = Arc::new(MatchEngine::new(event_bus));
    let scheduler = RetryScheduler::start(Arc::clone(&engine), config.retry_interval)
        .context("starting retry scheduler")?;

    let app = build_app(AppState { engine });
    tracing::info!(addr = %config.listen_addr, "server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.stop().await;
    tracing::info!("peer-lobby stopped");

    served.context("serving http")
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
