//! Application layer: the cache handle shared by request handlers.
//!
//! # Components
//!
//! - [`CacheHandle`] - JSON get/set/setex/delete/count/flush over a [`crate::infrastructure::cache::CacheStore`]
//! - [`CacheOptions`] - Connection and sharing options
//! - [`Ttl`], [`Keys`] - Operation arguments

pub mod args;
pub mod handle;
pub mod options;

pub use args::{Keys, Ttl};
pub use handle::{CacheHandle, ConnectionState, Deletion};
pub use options::CacheOptions;
