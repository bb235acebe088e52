//! Redis-backed store implementation.

use super::store::{CacheResult, CacheStore};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, trace};

/// Redis store reached through a [`ConnectionManager`].
///
/// The manager multiplexes commands over one connection and queues them
/// internally, so the store is shared without extra locking. Errors are
/// returned to the caller unchanged.
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379/0"`).
    ///   A database path segment makes the client select it on every (re)connect.
    ///
    /// # Errors
    ///
    /// Returns [`super::CacheError::Store`] if the URL is invalid, the connection
    /// cannot be established, or the PING check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", crate::config::mask_connection_string(redis_url));

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn select(&self, db: i64) -> CacheResult<()> {
        let mut conn = self.client.clone();
        redis::cmd("SELECT").arg(db).query_async::<()>(&mut conn).await?;
        debug!("Redis SELECT {}", db);
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();
        let value = conn.get::<_, Option<String>>(key).await?;
        trace!("Redis GET {} (found: {})", key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();
        conn.set::<_, _, ()>(key, value).await?;
        trace!("Redis SET {}", key);
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> CacheResult<()> {
        let mut conn = self.client.clone();
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        trace!("Redis SETEX {} (TTL: {}s)", key, seconds);
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        let mut conn = self.client.clone();
        let deleted = conn.del::<_, u64>(key).await?;
        trace!("Redis DEL {} (deleted: {})", key, deleted);
        Ok(deleted)
    }

    async fn dbsize(&self) -> CacheResult<u64> {
        let mut conn = self.client.clone();
        let size = redis::cmd("DBSIZE").query_async::<u64>(&mut conn).await?;
        Ok(size)
    }

    async fn flushdb(&self) -> CacheResult<()> {
        let mut conn = self.client.clone();
        redis::cmd("FLUSHDB").query_async::<()>(&mut conn).await?;
        debug!("Redis FLUSHDB");
        Ok(())
    }

    async fn ping(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
