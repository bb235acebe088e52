//! Handlers for reading and writing cache entries.

use axum::{
    Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::api::dto::entry::{
    CountResponse, DeleteRequest, DeleteResponse, DeletionResult, EntryResponse, GetEntryQuery,
    PutEntryQuery, StoredResponse,
};
use crate::api::middleware::cache::Cache;
use crate::application::Ttl;
use crate::error::AppError;

/// Reads a cached value.
///
/// # Endpoint
///
/// `GET /entries/{key}?cacheable=true`
///
/// # Errors
///
/// Returns 404 Not Found on cache miss, and when `cacheable=false`
/// bypasses the cache.
pub async fn get_entry_handler(
    Path(key): Path<String>,
    Query(query): Query<GetEntryQuery>,
    Cache(cache): Cache,
) -> Result<Json<EntryResponse>, AppError> {
    match cache.get::<Value>(&key, query.cacheable).await? {
        Some(value) => Ok(Json(EntryResponse { key, value })),
        None => Err(AppError::not_found(
            "Entry not found",
            json!({ "key": key, "cacheable": query.cacheable }),
        )),
    }
}

/// Stores the JSON request body under `key`.
///
/// # Endpoint
///
/// `PUT /entries/{key}?ttl=60`
///
/// With `ttl` the value expires after that many seconds (a non-numeric
/// `ttl` means no expiry). Without it the configured default max-age applies.
pub async fn put_entry_handler(
    Path(key): Path<String>,
    Query(query): Query<PutEntryQuery>,
    Cache(cache): Cache,
    Json(value): Json<Value>,
) -> Result<Json<StoredResponse>, AppError> {
    let ok = match query.ttl.as_deref() {
        Some(raw) => cache.setex(&key, Ttl::from(raw), &value).await?,
        None => cache.put(&key, &value).await?,
    };

    Ok(Json(StoredResponse { ok }))
}

/// Removes a single entry.
///
/// # Endpoint
///
/// `DELETE /entries/{key}`
pub async fn delete_entry_handler(
    Path(key): Path<String>,
    Cache(cache): Cache,
) -> Result<Json<DeleteResponse>, AppError> {
    let deletions = cache.delete(key).await?;

    Ok(Json(DeleteResponse {
        results: deletions.into_iter().map(DeletionResult::from).collect(),
    }))
}

/// Removes a batch of entries, reporting each key's outcome.
///
/// # Endpoint
///
/// `POST /batch/delete`
///
/// # Request Body
///
/// ```json
/// { "keys": ["a", "b"] }
/// ```
pub async fn delete_entries_handler(
    Cache(cache): Cache,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deletions = cache.delete(request.keys).await?;

    Ok(Json(DeleteResponse {
        results: deletions.into_iter().map(DeletionResult::from).collect(),
    }))
}

/// Returns the number of cached entries.
///
/// # Endpoint
///
/// `GET /entries`
pub async fn count_entries_handler(Cache(cache): Cache) -> Result<Json<CountResponse>, AppError> {
    let count = cache.count().await?;
    Ok(Json(CountResponse { count }))
}

/// Removes every entry in the selected database.
///
/// # Endpoint
///
/// `DELETE /entries`
pub async fn flush_entries_handler(Cache(cache): Cache) -> Result<StatusCode, AppError> {
    cache.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
