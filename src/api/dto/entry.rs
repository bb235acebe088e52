//! DTOs for cache entry endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::Deletion;

/// Query parameters for `GET /entries/{key}`.
#[derive(Debug, Deserialize)]
pub struct GetEntryQuery {
    /// Set to `false` to bypass the cache for this read.
    #[serde(default = "default_cacheable")]
    pub cacheable: bool,
}

fn default_cacheable() -> bool {
    true
}

/// Query parameters for `PUT /entries/{key}`.
#[derive(Debug, Deserialize)]
pub struct PutEntryQuery {
    /// Expiry in seconds. Non-numeric values mean no expiry.
    pub ttl: Option<String>,
}

/// A cached value.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: Value,
}

/// Result of a write.
#[derive(Debug, Serialize)]
pub struct StoredResponse {
    pub ok: bool,
}

/// Number of cached entries.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Request body for `POST /batch/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub keys: Vec<String>,
}

/// Per-key outcome of a delete.
#[derive(Debug, Serialize)]
pub struct DeletionResult {
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Deletion> for DeletionResult {
    fn from(deletion: Deletion) -> Self {
        match deletion.outcome {
            Ok(deleted) => Self {
                key: deletion.key,
                deleted: Some(deleted),
                error: None,
            },
            Err(e) => Self {
                key: deletion.key,
                deleted: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Outcomes of a delete, one per requested key.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub results: Vec<DeletionResult>,
}
