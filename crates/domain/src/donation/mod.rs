//! Donation request aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;
mod state;

pub use aggregate::DonationRequest;
pub use commands::*;
pub use events::{
    DonationRequestCompletedData, DonationRequestCreatedData, DonationRequestDecidedData,
    DonationRequestEvent,
};
pub use service::DonationRequestService;
pub use state::DonationRequestStatus;

use common::DonationItemId;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::listing::DonationStatus;

/// Errors that can occur during donation request operations.
#[derive(Debug, Error)]
pub enum DonationRequestError {
    /// Request is not in the expected state.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: DonationRequestStatus,
        action: &'static str,
    },

    /// Owners cannot request their own donations.
    #[error("You cannot request your own donation")]
    OwnDonation,

    /// The donation item is not in a status that allows the transition.
    #[error("Donation item {donation_id} is {status}")]
    ItemUnavailable {
        donation_id: DonationItemId,
        status: DonationStatus,
    },

    /// Ratings require a completed request.
    #[error("Donation request is {current_state}, not COMPLETED")]
    NotCompleted {
        current_state: DonationRequestStatus,
    },
}

impl DonationRequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DonationRequestError::OwnDonation => ErrorKind::InvalidOperation,
            DonationRequestError::InvalidStateTransition { .. }
            | DonationRequestError::ItemUnavailable { .. }
            | DonationRequestError::NotCompleted { .. } => ErrorKind::InvalidState,
        }
    }
}
