//! Shared types for the exchange request engine.

pub mod types;

pub use types::{
    DonationItemId, DonationRequestId, ItemId, NotificationId, ParseIdError, RatingId,
    TradeRequestId, UserId,
};
