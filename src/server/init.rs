//! Server initialization
//!
//! Builds the canvas service and router, binds the listener and serves until
//! shutdown.

use anyhow::{Context, Result};
use axum::Router;
use pixelboard_canvas::{canvas_router, CanvasService, CanvasState, Palette};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::AppConfig;
use super::shutdown::spawn_signal_listener;
use super::validation::validate_config;

/// Build the application router for `config`
pub fn build_app(config: &AppConfig, shutdown: CancellationToken) -> Result<Router> {
    let service = CanvasService::new(Palette::burn(), &config.canvas)
        .context("Failed to create canvas")?;
    let state = CanvasState::new(Arc::new(service), shutdown);

    Ok(canvas_router(
        state,
        &config.static_files.index_path,
        config.server.max_body_bytes,
    )
    .layer(TraceLayer::new_for_http()))
}

/// Serve `config` on an already bound listener until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    config: &AppConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = build_app(config, shutdown.clone())?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server error")
}

/// Run the server
pub async fn run(config: AppConfig) -> Result<()> {
    validate_config(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Starting server on http://{}", addr);

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone());

    serve(listener, &config, shutdown).await?;

    info!("Pixelboard shutdown complete");
    Ok(())
}
