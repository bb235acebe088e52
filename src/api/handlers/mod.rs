//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod entries;
pub mod health;

pub use entries::{
    count_entries_handler, delete_entries_handler, delete_entry_handler, flush_entries_handler,
    get_entry_handler, put_entry_handler,
};
pub use health::health_handler;
