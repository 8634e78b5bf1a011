//! Store error types

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file IO failed
    #[error("store io error: {0}")]
    Io(#[from] io::Error),

    /// Journal contents failed checksum or structural validation
    #[error("journal corrupted at byte {offset}: {detail}")]
    Corrupted { offset: u64, detail: String },

    /// A declared unique field already holds this value
    #[error("duplicate value for unique field {collection}.{field}: {value}")]
    DuplicateValue {
        collection: String,
        field: String,
        value: String,
    },

    /// Operation referenced a collection that was never declared
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// Document body was not a JSON object
    #[error("document body must be a JSON object")]
    NotAnObject,

    /// Document encoding or decoding failed
    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A lock was poisoned by a panicking writer
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Builds a corruption error for a record at the given journal offset.
    pub fn corrupted(offset: u64, detail: impl Into<String>) -> Self {
        StoreError::Corrupted {
            offset,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupted_message_names_offset() {
        let err = StoreError::corrupted(42, "checksum mismatch");
        assert_eq!(
            err.to_string(),
            "journal corrupted at byte 42: checksum mismatch"
        );
    }

    #[test]
    fn test_duplicate_message_names_field() {
        let err = StoreError::DuplicateValue {
            collection: "users".to_string(),
            field: "username".to_string(),
            value: "alice".to_string(),
        };
        assert!(err.to_string().contains("users.username"));
        assert!(err.to_string().contains("alice"));
    }
}
