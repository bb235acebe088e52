//! # Request Cache
//!
//! A small JSON cache for Axum/Tower request pipelines, backed by Redis.
//!
//! ## Architecture
//!
//! - **Infrastructure Layer** ([`infrastructure`]) - Store backends behind the [`CacheStore`] trait
//! - **Application Layer** ([`application`]) - The shared [`CacheHandle`] and its options
//! - **API Layer** ([`api`]) - The [`CacheLayer`] middleware, extractor, handlers and DTOs
//!
//! ## Features
//!
//! - get / set / setex / delete / count / flush with JSON encoding
//! - Per-read cache bypass
//! - Logical database selection and a default max-age
//! - Fail-fast `ConnectionNotReady` errors until the store is connected
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum::{Router, Json, routing::get};
//! use request_cache::prelude::*;
//!
//! async fn handler(Cache(cache): Cache) -> Result<Json<Option<u32>>, AppError> {
//!     Ok(Json(cache.get("visits", true).await?))
//! }
//!
//! let app: Router = Router::new()
//!     .route("/", get(handler))
//!     .layer(CacheLayer::new(CacheOptions::default()));
//! ```
//!
//! ## Configuration
//!
//! The bundled server reads its settings from environment variables via
//! [`config::Config`].

pub mod api;
pub mod application;
pub mod error;
pub mod infrastructure;

pub mod config;
pub mod server;

pub mod routes;

pub use api::middleware::cache::{Cache, CacheLayer, CacheMiddleware};
pub use application::{CacheHandle, CacheOptions, ConnectionState};
pub use error::AppError;
pub use infrastructure::cache::{CacheError, CacheResult, CacheStore};

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::api::middleware::cache::{Cache, CacheLayer};
    pub use crate::application::{CacheHandle, CacheOptions, ConnectionState, Deletion, Keys, Ttl};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{CacheError, CacheResult, MemoryStore, RedisStore};
}
