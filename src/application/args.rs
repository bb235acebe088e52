//! Argument types accepted by cache operations.

use serde_json::Value;
use std::time::Duration;

/// Expiry in whole seconds for [`crate::application::CacheHandle::setex`].
///
/// Anything that is not a usable number converts to zero, and a zero TTL
/// stores the value without expiry. Sub-second durations round up so that a
/// short max-age never silently becomes "no expiry".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ttl(u64);

impl Ttl {
    /// No expiry.
    pub const NONE: Self = Self(0);

    /// Creates a TTL of `seconds`.
    pub const fn from_secs(seconds: u64) -> Self {
        Self(seconds)
    }

    /// The TTL in seconds.
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Whether the value should be stored without expiry.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Ttl {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<u32> for Ttl {
    fn from(seconds: u32) -> Self {
        Self(u64::from(seconds))
    }
}

impl From<i64> for Ttl {
    fn from(seconds: i64) -> Self {
        Self(u64::try_from(seconds).unwrap_or(0))
    }
}

impl From<i32> for Ttl {
    fn from(seconds: i32) -> Self {
        Self::from(i64::from(seconds))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        let seconds = duration.as_secs();
        if duration.subsec_nanos() > 0 {
            Self(seconds.saturating_add(1))
        } else {
            Self(seconds)
        }
    }
}

impl<T: Into<Ttl>> From<Option<T>> for Ttl {
    fn from(ttl: Option<T>) -> Self {
        ttl.map_or(Self::NONE, Into::into)
    }
}

impl From<&str> for Ttl {
    fn from(raw: &str) -> Self {
        raw.trim().parse::<u64>().map_or(Self::NONE, Self)
    }
}

impl From<&Value> for Ttl {
    fn from(raw: &Value) -> Self {
        match raw {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.is_finite() && *f > 0.0)
                        .map(|f| f.ceil() as u64)
                })
                .map_or(Self::NONE, Self),
            _ => Self::NONE,
        }
    }
}

/// One key or a batch of keys for [`crate::application::CacheHandle::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    /// Flattens into the list of keys, in input order.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(key) => vec![key],
            Self::Many(keys) => keys,
        }
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Self::One(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Self::One(key)
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Self::Many(keys)
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Self::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Self::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}
