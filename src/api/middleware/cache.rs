//! Middleware attaching the shared cache handle to every request.

use std::task::{Context, Poll};

use axum::extract::FromRequestParts;
use axum::http::{Request, request::Parts};
use serde_json::json;
use tower::{Layer, Service};
use tracing::info;

use crate::application::{CacheHandle, CacheOptions};
use crate::error::AppError;

/// Layer that inserts one shared [`CacheHandle`] into each request's extensions.
///
/// The handle is created once, when the layer is built, and every request
/// receives a clone of the same reference. The wrapped service is always
/// called; the layer never reads or writes cache contents itself.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/entries/{key}", get(get_entry_handler))
///     .layer(CacheLayer::new(CacheOptions::default()));
/// ```
#[derive(Debug, Clone)]
pub struct CacheLayer {
    cache: CacheHandle,
}

impl CacheLayer {
    /// Builds the layer from `options`.
    ///
    /// Uses `options.cache` as-is when present; otherwise starts a new Redis
    /// connection with [`CacheHandle::connect`], which requires a Tokio runtime.
    pub fn new(options: CacheOptions) -> Self {
        let cache = match options.cache {
            Some(ref cache) => cache.clone(),
            None => CacheHandle::connect(&options),
        };
        info!("Cache layer ready");
        Self { cache }
    }

    /// The handle shared with every request.
    pub fn handle(&self) -> &CacheHandle {
        &self.cache
    }
}

impl From<CacheHandle> for CacheLayer {
    fn from(cache: CacheHandle) -> Self {
        Self::new(CacheOptions::with_cache(cache))
    }
}

impl<S> Layer<S> for CacheLayer {
    type Service = CacheMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CacheMiddleware {
            inner,
            cache: self.cache.clone(),
        }
    }
}

/// Service produced by [`CacheLayer`].
#[derive(Debug, Clone)]
pub struct CacheMiddleware<S> {
    inner: S,
    cache: CacheHandle,
}

impl<S, B> Service<Request<B>> for CacheMiddleware<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.cache.clone());
        self.inner.call(req)
    }
}

/// Extractor for the handle attached by [`CacheLayer`].
///
/// Rejects with `500 Internal Server Error` when the route is not wrapped by
/// the layer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Cache(cache): Cache) -> Result<Json<u64>, AppError> {
///     Ok(Json(cache.count().await?))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Cache(pub CacheHandle);

impl<S> FromRequestParts<S> for Cache
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CacheHandle>()
            .cloned()
            .map(Cache)
            .ok_or_else(|| {
                AppError::internal(
                    "Cache layer is not installed",
                    json!({ "reason": "request has no cache handle" }),
                )
            })
    }
}
