//! API route configuration.
//!
//! Every handler reads the cache through the handle attached by
//! [`crate::api::middleware::cache::CacheLayer`].

use crate::api::handlers::{
    count_entries_handler, delete_entries_handler, delete_entry_handler, flush_entries_handler,
    get_entry_handler, put_entry_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Cache entry routes.
///
/// # Endpoints
///
/// - `GET    /entries`          - Number of cached entries
/// - `DELETE /entries`          - Flush the selected database
/// - `POST   /batch/delete`     - Delete a batch of keys
/// - `GET    /entries/{key}`    - Read an entry (`?cacheable=false` bypasses)
/// - `PUT    /entries/{key}`    - Store the JSON body (`?ttl=` seconds)
/// - `DELETE /entries/{key}`    - Delete one key
pub fn entry_routes() -> Router {
    Router::new()
        .route(
            "/entries",
            get(count_entries_handler).delete(flush_entries_handler),
        )
        .route(
            "/entries/{key}",
            get(get_entry_handler)
                .put(put_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/batch/delete", post(delete_entries_handler))
}
