//! Store backends for the cache handle.
//!
//! Provides a [`CacheStore`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed store
//! - [`MemoryStore`] - In-process store for tests and Redis-less development

mod memory_store;
mod redis_store;
mod store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{CacheError, CacheResult, CacheStore};

#[cfg(test)]
pub use store::MockCacheStore;
