//! HTTP server initialization and runtime setup.
//!
//! Handles cache layer setup and the Axum server lifecycle.

use crate::api::middleware::cache::CacheLayer;
use crate::config::Config;
use crate::routes::app_router;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Cache layer (Redis connection is established in the background)
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// Requests that arrive before Redis is connected get `503 Service Unavailable`
/// from cache-backed endpoints.
///
/// # Errors
///
/// Returns an error if:
/// - Listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let cache = CacheLayer::new(config.cache_options());

    let app = app_router(cache);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
