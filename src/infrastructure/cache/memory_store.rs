//! In-process store for tests and local runs without Redis.

use super::store::{CacheResult, CacheStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// A store that keeps entries in process memory.
///
/// Mirrors the parts of Redis the cache relies on: numbered logical
/// databases, SELECT, and per-key expiry. Expired entries are dropped lazily
/// when they are read or counted. Uses `tokio::time`, so tests can pause and
/// advance the clock.
///
/// # Use Cases
///
/// - Unit and integration tests
/// - Development environments without Redis
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: Mutex<HashMap<i64, HashMap<String, Entry>>>,
    selected: AtomicI64,
}

impl MemoryStore {
    /// Creates an empty store with database 0 selected.
    pub fn new() -> Self {
        debug!("Using MemoryStore (in-process cache)");
        Self::default()
    }

    /// Index of the currently selected logical database.
    pub fn selected_db(&self) -> i64 {
        self.selected.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, HashMap<String, Entry>>> {
        self.databases.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, key: &str, value: &str, expires_at: Option<Instant>) {
        let db = self.selected_db();
        self.lock().entry(db).or_default().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn select(&self, db: i64) -> CacheResult<()> {
        self.selected.store(db, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let db = self.selected_db();
        let now = Instant::now();
        let mut databases = self.lock();
        let Some(entries) = databases.get_mut(&db) else {
            return Ok(None);
        };

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        self.insert(key, value, None);
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> CacheResult<()> {
        // Past the clock's range means the entry never expires.
        let expires_at = Instant::now().checked_add(Duration::from_secs(seconds));
        self.insert(key, value, expires_at);
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        let db = self.selected_db();
        let now = Instant::now();
        let removed = self
            .lock()
            .get_mut(&db)
            .and_then(|entries| entries.remove(key))
            .is_some_and(|entry| entry.is_live(now));
        Ok(u64::from(removed))
    }

    async fn dbsize(&self) -> CacheResult<u64> {
        let db = self.selected_db();
        let now = Instant::now();
        let mut databases = self.lock();
        let Some(entries) = databases.get_mut(&db) else {
            return Ok(0);
        };

        entries.retain(|_, entry| entry.is_live(now));
        Ok(entries.len() as u64)
    }

    async fn flushdb(&self) -> CacheResult<()> {
        let db = self.selected_db();
        self.lock().remove(&db);
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}
