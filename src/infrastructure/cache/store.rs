//! Store trait and cache error types.

use async_trait::async_trait;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The handle has not finished connecting to the store yet.
    #[error("Cache store is not connected")]
    ConnectionNotReady,

    /// A value could not be encoded to JSON, or stored text could not be parsed back.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store rejected or failed a command. The original error is kept as the source.
    #[error("Cache store error: {0}")]
    Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl CacheError {
    /// Wraps any store-side failure.
    pub fn store(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Store(err.into())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::store(err)
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Primitive commands of a remote key-value store.
///
/// The cache handle layers JSON encoding and connection-state checks on top
/// of these; implementations only move text in and out of the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisStore`] - Redis via `ConnectionManager`
/// - [`crate::infrastructure::cache::MemoryStore`] - In-process store for tests and local runs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Switches the connection to the given logical database.
    async fn select(&self, db: i64) -> CacheResult<()>;

    /// Fetches the raw text stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(text))` if the key exists
    /// - `Ok(None)` if it does not
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` without expiry.
    async fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Stores `value` under `key`, expiring after `seconds`.
    ///
    /// `seconds` is always greater than zero.
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> CacheResult<()>;

    /// Removes `key`, returning the number of entries removed.
    async fn del(&self, key: &str) -> CacheResult<u64>;

    /// Number of entries in the selected logical database.
    async fn dbsize(&self) -> CacheResult<u64>;

    /// Removes every entry in the selected logical database.
    async fn flushdb(&self) -> CacheResult<()>;

    /// Checks if the store answers.
    async fn ping(&self) -> bool;
}
