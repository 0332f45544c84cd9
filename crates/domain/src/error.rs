//! Domain error types.

use common::UserId;
use record_store::StoreError;
use thiserror::Error;

use crate::donation::DonationRequestError;
use crate::services::ServiceError;
use crate::trade::TradeRequestError;

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced request, item, or user does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller is not the owner or requester the transition requires.
    #[error("User {actor} is not authorized to {action}")]
    Unauthorized {
        actor: UserId,
        action: &'static str,
    },

    /// A semantically barred action, independent of request state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// An error raised by the trade request aggregate.
    #[error("Trade request error: {0}")]
    Trade(TradeRequestError),

    /// An error raised by the donation request aggregate.
    #[error("Donation request error: {0}")]
    Donation(DonationRequestError),

    /// An error occurred in the record store.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// An external collaborator failed.
    #[error("Collaborator error: {0}")]
    Service(#[from] ServiceError),
}

/// Coarse classification of a [`DomainError`], used by outer layers to pick
/// a client-visible status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidState,
    InvalidOperation,
    Conflict,
    Internal,
}

impl DomainError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DomainError::InvalidOperation(_) => ErrorKind::InvalidOperation,
            DomainError::Trade(e) => e.kind(),
            DomainError::Donation(e) => e.kind(),
            DomainError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            DomainError::Store(StoreError::ConcurrencyConflict { .. })
            | DomainError::Store(StoreError::AlreadyExists { .. }) => ErrorKind::Conflict,
            DomainError::Store(_) => ErrorKind::Internal,
            DomainError::Service(ServiceError::NotFound(_)) => ErrorKind::NotFound,
            DomainError::Service(ServiceError::Duplicate(_)) => ErrorKind::InvalidOperation,
            DomainError::Service(ServiceError::StatusMismatch { .. }) => ErrorKind::InvalidState,
            DomainError::Service(_) => ErrorKind::Internal,
        }
    }
}

impl From<TradeRequestError> for DomainError {
    fn from(e: TradeRequestError) -> Self {
        DomainError::Trade(e)
    }
}

impl From<DonationRequestError> for DomainError {
    fn from(e: DonationRequestError) -> Self {
        DomainError::Donation(e)
    }
}
