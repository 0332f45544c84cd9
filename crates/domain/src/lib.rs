//! Exchange request lifecycle engine.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait and CommandHandler for versioned, compare-and-swap transitions
//! - Trade request state machine (PENDING → ACCEPTED | REJECTED)
//! - Donation request state machine (PENDING → ACCEPTED → COMPLETED, PENDING → REJECTED)
//! - Ratings attached to donation requests
//! - Collaborator traits for the item catalog, user directory, notification sink and rating ledger
//! - Read-only projections over requests

pub mod aggregate;
pub mod command;
pub mod donation;
pub mod error;
pub mod listing;
pub mod policy;
pub mod rating;
pub mod services;
pub mod trade;
pub mod value_objects;
pub mod views;

pub use aggregate::{Aggregate, DomainEvent};
pub use command::{Command, CommandHandler, CommandResult};
pub use donation::{
    AcceptDonationRequest, CompleteDonationRequest, CreateDonationRequest, DonationRequest,
    DonationRequestError, DonationRequestEvent, DonationRequestService, DonationRequestStatus,
    RejectDonationRequest,
};
pub use error::{DomainError, ErrorKind};
pub use listing::{DonationItem, DonationStatus, Item, ItemStatus};
pub use policy::LifecyclePolicy;
pub use rating::{RateDonation, RatingService};
pub use services::{
    ItemCatalog, Mailbox, Notification, NotificationSink, Rating, RatingLedger, RecordItemCatalog,
    RecordRatingLedger, RecordUserDirectory, ServiceError, UserDirectory, UserProfile,
};
pub use trade::{
    AcceptTradeRequest, CreateTradeRequest, RejectTradeRequest, TradeKind, TradeRequest,
    TradeRequestError, TradeRequestEvent, TradeRequestService, TradeStatus,
};
pub use value_objects::{Money, Score};
pub use views::{
    CompletionDetails, ContactCard, DonationRequestView, DonationSnapshot, ItemSnapshot,
    TradeRequestDetails,
};
