//! Construction options for the cache handle and layer.

use std::time::Duration;
use url::{ParseError, Url};

use super::handle::CacheHandle;

/// Options accepted by [`crate::api::middleware::cache::CacheLayer::new`].
///
/// When `cache` is set, that handle is shared as-is and the connection
/// settings are ignored.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Existing handle to share instead of opening a new connection.
    pub cache: Option<CacheHandle>,
    /// Full connection string; takes priority over `host`/`port`/`password`.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Logical database selected once the connection is up.
    pub db: Option<i64>,
    /// Default expiry applied by [`CacheHandle::put`].
    pub max_age: Option<Duration>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            cache: None,
            url: None,
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: None,
            max_age: None,
        }
    }
}

impl CacheOptions {
    /// Options that share an existing handle.
    pub fn with_cache(cache: CacheHandle) -> Self {
        Self {
            cache: Some(cache),
            ..Self::default()
        }
    }

    /// Connection string for the store.
    ///
    /// Priority:
    /// 1. `url`
    /// 2. Built from `host`, `port` and `password`
    ///
    /// `db` is always written into the result (path for TCP schemes, `db`
    /// query parameter for unix sockets), overriding any database in `url`.
    /// The Redis client selects it on every connect and reconnect. An empty
    /// password means no authentication; passwords are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `url` is malformed or the host is invalid.
    pub fn connection_url(&self) -> Result<String, ParseError> {
        let mut url = match &self.url {
            Some(raw) => Url::parse(raw)?,
            None => {
                let mut url = Url::parse(&format!("redis://{}:{}", self.host, self.port))?;
                if let Some(pwd) = self.password.as_deref().filter(|p| !p.is_empty()) {
                    url.set_password(Some(pwd))
                        .map_err(|()| ParseError::EmptyHost)?;
                }
                url
            }
        };

        if let Some(db) = self.db {
            match url.scheme() {
                "redis+unix" | "unix" => {
                    let pairs: Vec<(String, String)> = url
                        .query_pairs()
                        .filter(|(name, _)| name != "db")
                        .map(|(name, value)| (name.into_owned(), value.into_owned()))
                        .collect();
                    url.query_pairs_mut()
                        .clear()
                        .extend_pairs(pairs)
                        .append_pair("db", &db.to_string());
                }
                _ => url.set_path(&format!("/{}", db)),
            }
        }

        Ok(url.to_string())
    }
}
