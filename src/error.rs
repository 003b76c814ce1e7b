// Failure modes surfaced by the retrieval and aggregation layers.
//
// Everything else in the query engine resolves to sentinel values
// (placeholder product, 0.0 average, zeroed statistics) instead of erroring.

use thiserror::Error;

/// Bulk retrieval failed. Fatal to the calling query; nothing recovers
/// from it locally.
#[derive(Debug, Error)]
#[error("storage unavailable: {reason}")]
pub struct StorageUnavailable {
    reason: String,
}

impl StorageUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        StorageUnavailable {
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for StorageUnavailable {
    fn from(err: rusqlite::Error) -> Self {
        StorageUnavailable::new(err.to_string())
    }
}

/// Two snapshot rows mapped to the same key while building a keyed report.
/// The to-map operations fail fast rather than silently overwriting.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("duplicate key while building map: {key}")]
pub struct DuplicateKeyError {
    pub key: i64,
}

impl DuplicateKeyError {
    pub fn new(key: i64) -> Self {
        DuplicateKeyError { key }
    }
}
