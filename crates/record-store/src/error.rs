use thiserror::Error;
use uuid::Uuid;

use crate::Version;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored version did not match the version the caller expected.
    #[error(
        "Concurrency conflict for {kind} {id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        kind: String,
        id: Uuid,
        expected: Version,
        actual: Version,
    },

    /// No record exists under the given key.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: Uuid },

    /// A record already exists under the given key.
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: String, id: Uuid },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
