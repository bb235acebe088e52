//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: cache connection and PING
//! - `/entries/*`        - Cache entry API
//!
//! # Middleware
//!
//! - **Cache** - Attaches the shared cache handle to every request
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::cache::CacheLayer;
use crate::api::middleware::tracing;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes with the cache layer installed, without path normalization.
pub fn router(cache: CacheLayer) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::entry_routes())
        .layer(cache)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(cache: CacheLayer) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(cache))
}
