//! Trade request aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;
mod state;

pub use aggregate::TradeRequest;
pub use commands::*;
pub use events::{
    TradeRequestAcceptedData, TradeRequestCreatedData, TradeRequestEvent,
    TradeRequestRejectedData,
};
pub use service::TradeRequestService;
pub use state::{TradeKind, TradeStatus};

use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during trade request operations.
#[derive(Debug, Error)]
pub enum TradeRequestError {
    /// Request is not in the expected state.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: TradeStatus,
        action: &'static str,
    },

    /// Money offers cannot be negative.
    #[error("Invalid money offer: {cents} cents (must not be negative)")]
    NegativeMoneyOffer { cents: i64 },

    /// Only item trades can carry a selected item.
    #[error("An item cannot be selected on a money trade")]
    SelectionOnMoneyTrade,
}

impl TradeRequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TradeRequestError::InvalidStateTransition { .. } => ErrorKind::InvalidState,
            TradeRequestError::NegativeMoneyOffer { .. }
            | TradeRequestError::SelectionOnMoneyTrade => ErrorKind::InvalidOperation,
        }
    }
}
