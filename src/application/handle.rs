//! Shared cache handle: JSON encoding and connection-state checks over a store.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use super::args::{Keys, Ttl};
use super::options::CacheOptions;
use crate::infrastructure::cache::{CacheError, CacheResult, CacheStore, RedisStore};

/// Connection state of a [`CacheHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Store calls are rejected with [`CacheError::ConnectionNotReady`].
    Disconnected,
    /// Store calls are attempted.
    Connected,
}

enum Connection {
    Disconnected,
    Connected(Arc<dyn CacheStore>),
}

/// Outcome of deleting a single key.
#[derive(Debug)]
pub struct Deletion {
    pub key: String,
    /// `Ok(true)` if an entry was removed, `Ok(false)` if none existed.
    pub outcome: CacheResult<bool>,
}

struct Inner {
    connection: RwLock<Connection>,
    db: Option<i64>,
    default_max_age: Option<Duration>,
}

/// Handle to the remote key-value store.
///
/// Cloning is cheap and every clone refers to the same connection, so one
/// handle is created at setup and shared by all requests.
///
/// A handle starts [`ConnectionState::Disconnected`] and becomes
/// [`ConnectionState::Connected`] once a store is attached via
/// [`CacheHandle::establish`]. There is no transition back and no reconnect
/// logic at this level; the Redis client manages its own reconnects.
///
/// Every operation returns its result once: nothing panics, and errors from
/// encoding or the store are returned as [`CacheError`].
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<Inner>,
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("state", &self.state())
            .field("db", &self.inner.db)
            .field("default_max_age", &self.inner.default_max_age)
            .finish()
    }
}

impl CacheHandle {
    /// Creates a disconnected handle.
    ///
    /// `db` is selected when a store is attached; `default_max_age` is used
    /// by [`CacheHandle::put`].
    pub fn new(db: Option<i64>, default_max_age: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Inner {
                connection: RwLock::new(Connection::Disconnected),
                db,
                default_max_age,
            }),
        }
    }

    /// Creates a handle and starts connecting to Redis in the background.
    ///
    /// Returns immediately in the [`ConnectionState::Disconnected`] state.
    /// If the settings are invalid or the connection fails, it is logged and
    /// the handle stays disconnected.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(options: &CacheOptions) -> Self {
        let handle = Self::new(options.db, options.max_age);
        let url = match options.connection_url() {
            Ok(url) => url,
            Err(e) => {
                error!("Invalid Redis connection settings: {}", e);
                return handle;
            }
        };

        let background = handle.clone();
        tokio::spawn(async move {
            match RedisStore::connect(&url).await {
                Ok(store) => {
                    if let Err(e) = background.establish(store).await {
                        error!("Failed to prepare Redis connection: {}", e);
                    }
                }
                Err(e) => error!("Failed to connect to Redis: {}", e),
            }
        });

        handle
    }

    /// Creates a handle already connected to `store`.
    ///
    /// # Errors
    ///
    /// Returns the store error if selecting the configured database fails.
    pub async fn with_store(
        store: impl CacheStore + 'static,
        db: Option<i64>,
        default_max_age: Option<Duration>,
    ) -> CacheResult<Self> {
        let handle = Self::new(db, default_max_age);
        handle.establish(store).await?;
        Ok(handle)
    }

    /// Attaches a connected store and switches to [`ConnectionState::Connected`].
    ///
    /// Selects the configured logical database first. If that fails the
    /// handle stays disconnected.
    ///
    /// # Errors
    ///
    /// Returns the store error from SELECT.
    pub async fn establish(&self, store: impl CacheStore + 'static) -> CacheResult<()> {
        if let Some(db) = self.inner.db {
            store.select(db).await?;
            debug!("Selected logical database {}", db);
        }

        let mut connection = self
            .inner
            .connection
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if matches!(*connection, Connection::Connected(_)) {
            warn!("Cache handle already connected, replacing store");
        }
        *connection = Connection::Connected(Arc::new(store));
        info!("Cache connected");

        Ok(())
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        match *self
            .inner
            .connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
        {
            Connection::Disconnected => ConnectionState::Disconnected,
            Connection::Connected(_) => ConnectionState::Connected,
        }
    }

    /// Default expiry used by [`CacheHandle::put`].
    pub fn default_max_age(&self) -> Option<Duration> {
        self.inner.default_max_age
    }

    /// Resolves the connected store or fails fast.
    fn store(&self) -> CacheResult<Arc<dyn CacheStore>> {
        match &*self
            .inner
            .connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
        {
            Connection::Connected(store) => Ok(Arc::clone(store)),
            Connection::Disconnected => Err(CacheError::ConnectionNotReady),
        }
    }

    /// Fetches and decodes the value stored under `key`.
    ///
    /// When `cacheable` is `false` the store is not consulted and `Ok(None)`
    /// is returned, letting callers bypass the cache per request.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit
    /// - `Ok(None)` on cache miss or bypass
    ///
    /// # Errors
    ///
    /// - [`CacheError::ConnectionNotReady`] if not connected
    /// - [`CacheError::Serialization`] if the stored text is not valid JSON for `T`
    /// - [`CacheError::Store`] on store failure
    pub async fn get<T: DeserializeOwned>(&self, key: &str, cacheable: bool) -> CacheResult<Option<T>> {
        if !cacheable {
            debug!("Cache BYPASS: {}", key);
            return Ok(None);
        }

        let store = self.store()?;

        match store.get(key).await? {
            Some(text) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(serde_json::from_str(&text)?))
            }
            None => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    /// Stores `value` under `key` without expiry.
    ///
    /// # Errors
    ///
    /// - [`CacheError::ConnectionNotReady`] if not connected
    /// - [`CacheError::Serialization`] if `value` cannot be encoded (nothing is stored)
    /// - [`CacheError::Store`] on store failure
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<bool> {
        let store = self.store()?;
        let text = serde_json::to_string(value)?;

        store.set(key, &text).await?;
        debug!("Cache SET: {}", key);
        Ok(true)
    }

    /// Stores `value` under `key`, expiring after `ttl`.
    ///
    /// A zero TTL, including any non-numeric input converted through
    /// [`Ttl`], stores the value without expiry.
    ///
    /// # Errors
    ///
    /// Same as [`CacheHandle::set`].
    pub async fn setex<T: Serialize + ?Sized>(
        &self,
        key: &str,
        ttl: impl Into<Ttl>,
        value: &T,
    ) -> CacheResult<bool> {
        let store = self.store()?;
        let ttl = ttl.into();
        let text = serde_json::to_string(value)?;

        if ttl.is_none() {
            store.set(key, &text).await?;
        } else {
            store.set_ex(key, &text, ttl.as_secs()).await?;
        }
        debug!("Cache SETEX: {} (TTL: {}s)", key, ttl.as_secs());
        Ok(true)
    }

    /// Stores `value` under `key` using the handle's default max-age.
    ///
    /// Falls back to [`CacheHandle::set`] when no default is configured.
    ///
    /// # Errors
    ///
    /// Same as [`CacheHandle::set`].
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<bool> {
        match self.inner.default_max_age {
            Some(max_age) => self.setex(key, max_age, value).await,
            None => self.set(key, value).await,
        }
    }

    /// Removes one or more keys.
    ///
    /// Issues one delete per key and returns all outcomes together, in input
    /// order. A failure on one key does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionNotReady`] if not connected; per-key
    /// store failures are reported inside the returned [`Deletion`]s.
    pub async fn delete(&self, keys: impl Into<Keys>) -> CacheResult<Vec<Deletion>> {
        let store = self.store()?;
        let keys = keys.into().into_vec();

        let mut deletions = Vec::with_capacity(keys.len());
        for key in keys {
            let outcome = store.del(&key).await.map(|removed| removed > 0);
            match &outcome {
                Ok(true) => debug!("Cache DELETE: {}", key),
                Ok(false) => debug!("Cache DELETE (absent): {}", key),
                Err(e) => debug!("Cache DELETE failed for {}: {}", key, e),
            }
            deletions.push(Deletion { key, outcome });
        }

        Ok(deletions)
    }

    /// Number of entries in the selected logical database.
    ///
    /// # Errors
    ///
    /// [`CacheError::ConnectionNotReady`] or [`CacheError::Store`].
    pub async fn count(&self) -> CacheResult<u64> {
        let store = self.store()?;
        Ok(store.dbsize().await?)
    }

    /// Removes every entry in the selected logical database.
    ///
    /// # Errors
    ///
    /// [`CacheError::ConnectionNotReady`] or [`CacheError::Store`].
    pub async fn flush(&self) -> CacheResult<()> {
        let store = self.store()?;
        store.flushdb().await?;
        info!("Cache FLUSH");
        Ok(())
    }

    /// Checks whether the store is connected and answering.
    pub async fn ping(&self) -> bool {
        match self.store() {
            Ok(store) => store.ping().await,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{MemoryStore, MockCacheStore};
    use mockall::predicate::eq;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    async fn connected(store: MockCacheStore) -> CacheHandle {
        CacheHandle::with_store(store, None, None).await.unwrap()
    }

    fn store_failure() -> CacheError {
        CacheError::store("command failed")
    }

    #[tokio::test]
    async fn test_new_handle_is_disconnected() {
        let handle = CacheHandle::new(None, None);
        assert_eq!(handle.state(), ConnectionState::Disconnected);
        assert!(!handle.ping().await);
    }

    #[tokio::test]
    async fn test_disconnected_operations_fail_fast() {
        let handle = CacheHandle::new(None, None);

        assert!(matches!(
            handle.get::<Value>("k", true).await,
            Err(CacheError::ConnectionNotReady)
        ));
        assert!(matches!(
            handle.set("k", &json!(1)).await,
            Err(CacheError::ConnectionNotReady)
        ));
        assert!(matches!(
            handle.setex("k", 10u64, &json!(1)).await,
            Err(CacheError::ConnectionNotReady)
        ));
        assert!(matches!(
            handle.delete("k").await,
            Err(CacheError::ConnectionNotReady)
        ));
        assert!(matches!(handle.count().await, Err(CacheError::ConnectionNotReady)));
        assert!(matches!(handle.flush().await, Err(CacheError::ConnectionNotReady)));
    }

    #[tokio::test]
    async fn test_get_bypass_skips_store() {
        // No expectations: any store call would panic.
        let handle = connected(MockCacheStore::new()).await;

        let result = handle.get::<Value>("k", false).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_get_bypass_when_disconnected() {
        let handle = CacheHandle::new(None, None);
        assert!(matches!(handle.get::<Value>("k", false).await, Ok(None)));
    }

    #[tokio::test]
    async fn test_get_hit_decodes_json() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .with(eq("key"))
            .times(1)
            .returning(|_| Ok(Some(r#"{"value":1}"#.to_string())));
        let handle = connected(store).await;

        let value = handle.get::<Value>("key", true).await.unwrap();
        assert_eq!(value, Some(json!({ "value": 1 })));
    }

    #[tokio::test]
    async fn test_get_miss_is_not_an_error() {
        let mut store = MockCacheStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));
        let handle = connected(store).await;

        assert!(matches!(handle.get::<Value>("missing", true).await, Ok(None)));
    }

    #[tokio::test]
    async fn test_get_invalid_json_is_serialization_error() {
        let mut store = MockCacheStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("not json".to_string())));
        let handle = connected(store).await;

        assert!(matches!(
            handle.get::<Value>("key", true).await,
            Err(CacheError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_get_store_error_is_passed_through() {
        let mut store = MockCacheStore::new();
        store.expect_get().times(1).returning(|_| Err(store_failure()));
        let handle = connected(store).await;

        let err = handle.get::<Value>("key", true).await.unwrap_err();
        assert!(matches!(err, CacheError::Store(_)));
        assert!(err.to_string().contains("command failed"));
    }

    #[tokio::test]
    async fn test_set_encodes_json() {
        let mut store = MockCacheStore::new();
        store
            .expect_set()
            .with(eq("key"), eq(r#"{"value":1}"#))
            .times(1)
            .returning(|_, _| Ok(()));
        let handle = connected(store).await;

        assert!(handle.set("key", &json!({ "value": 1 })).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_unserializable_value_skips_store() {
        let handle = connected(MockCacheStore::new()).await;

        // JSON object keys must be strings.
        let mut value = BTreeMap::new();
        value.insert((1, 2), "tuple key");

        assert!(matches!(
            handle.set("key", &value).await,
            Err(CacheError::Serialization(_))
        ));
        assert!(matches!(
            handle.setex("key", 10u64, &value).await,
            Err(CacheError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_setex_passes_ttl() {
        let mut store = MockCacheStore::new();
        store
            .expect_set_ex()
            .with(eq("key"), eq("\"v\""), eq(60u64))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let handle = connected(store).await;

        assert!(handle.setex("key", 60u64, "v").await.unwrap());
    }

    #[tokio::test]
    async fn test_setex_non_numeric_ttl_stores_without_expiry() {
        let mut store = MockCacheStore::new();
        store.expect_set_ex().never();
        store.expect_set().times(3).returning(|_, _| Ok(()));
        let handle = connected(store).await;

        assert!(handle.setex("a", "soon", &1).await.unwrap());
        assert!(handle.setex("b", &json!({ "maxAge": -1 }), &2).await.unwrap());
        assert!(handle.setex("c", 0u64, &3).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_uses_default_max_age() {
        let mut store = MockCacheStore::new();
        store
            .expect_set_ex()
            .with(eq("key"), eq("true"), eq(2u64))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let handle = CacheHandle::with_store(store, None, Some(Duration::from_millis(1500)))
            .await
            .unwrap();

        assert!(handle.put("key", &true).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_without_default_max_age() {
        let mut store = MockCacheStore::new();
        store.expect_set().times(1).returning(|_, _| Ok(()));
        let handle = connected(store).await;

        assert!(handle.put("key", &true).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_many_reports_each_key_once() {
        let mut store = MockCacheStore::new();
        store.expect_del().with(eq("a")).times(1).returning(|_| Ok(1));
        store.expect_del().with(eq("b")).times(1).returning(|_| Ok(0));
        store
            .expect_del()
            .with(eq("c"))
            .times(1)
            .returning(|_| Err(CacheError::store("boom")));
        let handle = connected(store).await;

        let deletions = handle.delete(["a", "b", "c"]).await.unwrap();

        assert_eq!(deletions.len(), 3);
        assert_eq!(deletions[0].key, "a");
        assert!(matches!(deletions[0].outcome, Ok(true)));
        assert_eq!(deletions[1].key, "b");
        assert!(matches!(deletions[1].outcome, Ok(false)));
        assert_eq!(deletions[2].key, "c");
        assert!(matches!(deletions[2].outcome, Err(CacheError::Store(_))));
    }

    #[tokio::test]
    async fn test_delete_empty_batch() {
        let handle = connected(MockCacheStore::new()).await;
        let deletions = handle.delete(Vec::<String>::new()).await.unwrap();
        assert!(deletions.is_empty());
    }

    #[tokio::test]
    async fn test_establish_selects_database() {
        let mut store = MockCacheStore::new();
        store.expect_select().with(eq(4)).times(1).returning(|_| Ok(()));

        let handle = CacheHandle::with_store(store, Some(4), None).await.unwrap();
        assert_eq!(handle.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_failed_select_stays_disconnected() {
        let mut store = MockCacheStore::new();
        store
            .expect_select()
            .times(1)
            .returning(|_| Err(CacheError::store("DB index is out of range")));

        let handle = CacheHandle::new(Some(99), None);
        assert!(handle.establish(store).await.is_err());
        assert_eq!(handle.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_clones_share_connection() {
        let handle = CacheHandle::new(None, None);
        let shared = handle.clone();

        handle.establish(MemoryStore::new()).await.unwrap();
        assert_eq!(shared.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_flush_then_count_is_zero() {
        let handle = CacheHandle::with_store(MemoryStore::new(), Some(1), None)
            .await
            .unwrap();

        handle.set("a", &1).await.unwrap();
        handle.set("b", &2).await.unwrap();
        assert_eq!(handle.count().await.unwrap(), 2);

        handle.flush().await.unwrap();
        assert_eq!(handle.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_flush_store_error_is_returned() {
        let mut store = MockCacheStore::new();
        store.expect_flushdb().times(1).returning(|| Err(store_failure()));
        let handle = connected(store).await;

        assert!(matches!(handle.flush().await, Err(CacheError::Store(_))));
    }
}
