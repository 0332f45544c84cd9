//! External collaborators of the lifecycle engine.
//!
//! Each collaborator is a trait so the engine can be driven against any
//! backing system; the implementations here keep their data in a
//! [`RecordStore`](record_store::RecordStore).

pub mod catalog;
pub mod notifications;
pub mod ratings;
pub mod users;

pub use catalog::{ItemCatalog, RecordItemCatalog};
pub use notifications::{Mailbox, Notification, NotificationSink};
pub use ratings::{Rating, RatingLedger, RecordRatingLedger};
pub use users::{RecordUserDirectory, UserDirectory, UserProfile};

use record_store::StoreError;
use thiserror::Error;

/// Errors raised by collaborator implementations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The collaborator could not be reached or refused the call.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record with the same identity already exists.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A status write found the record in an unexpected status.
    #[error("Status mismatch: expected {expected}, found {actual}")]
    StatusMismatch { expected: String, actual: String },

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
