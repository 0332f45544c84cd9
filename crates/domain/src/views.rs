//! Read-only projections over requests, listings and profiles.
//!
//! Missing referenced records degrade to placeholders so one dangling
//! reference does not hide the rest of a listing.

use chrono::{DateTime, Utc};
use common::{DonationItemId, DonationRequestId, ItemId, TradeRequestId, UserId};
use serde::Serialize;

use crate::donation::{DonationRequest, DonationRequestStatus};
use crate::listing::{DonationItem, DonationStatus, Item, ItemStatus};
use crate::services::UserProfile;
use crate::trade::{TradeKind, TradeRequest, TradeStatus};
use crate::value_objects::Money;

pub const UNKNOWN_USER: &str = "Unknown User";
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Contact details of a counterpart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactCard {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub profile_image: Option<String>,
}

impl ContactCard {
    pub fn unknown(user_id: UserId) -> Self {
        Self {
            user_id,
            full_name: UNKNOWN_USER.to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            profile_image: None,
        }
    }

    pub(crate) fn resolve(user_id: UserId, profile: Option<&UserProfile>) -> Self {
        profile.map(Self::from).unwrap_or_else(|| Self::unknown(user_id))
    }
}

impl From<&UserProfile> for ContactCard {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.id,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            profile_image: profile.profile_image.clone(),
        }
    }
}

/// Public listing snapshot of a trade item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSnapshot {
    pub item_id: ItemId,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub category_id: Option<i64>,
    pub images: Vec<String>,
    /// `None` when the item could not be found.
    pub status: Option<ItemStatus>,
}

impl ItemSnapshot {
    pub fn unknown(item_id: ItemId) -> Self {
        Self {
            item_id,
            title: UNKNOWN_ITEM.to_string(),
            description: String::new(),
            price: Money::zero(),
            category_id: None,
            images: Vec::new(),
            status: None,
        }
    }

    pub(crate) fn resolve(item_id: ItemId, item: Option<&Item>) -> Self {
        item.map(Self::from).unwrap_or_else(|| Self::unknown(item_id))
    }
}

impl From<&Item> for ItemSnapshot {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
            price: item.price,
            category_id: item.category_id,
            images: item.images.clone(),
            status: Some(item.status),
        }
    }
}

/// Snapshot of a donation listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationSnapshot {
    pub donation_id: DonationItemId,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    /// `None` when the donation could not be found.
    pub status: Option<DonationStatus>,
}

impl DonationSnapshot {
    pub fn unknown(donation_id: DonationItemId) -> Self {
        Self {
            donation_id,
            title: UNKNOWN_ITEM.to_string(),
            description: String::new(),
            images: Vec::new(),
            status: None,
        }
    }

    pub(crate) fn resolve(donation_id: DonationItemId, item: Option<&DonationItem>) -> Self {
        item.map(Self::from)
            .unwrap_or_else(|| Self::unknown(donation_id))
    }
}

impl From<&DonationItem> for DonationSnapshot {
    fn from(item: &DonationItem) -> Self {
        Self {
            donation_id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
            images: item.images.clone(),
            status: Some(item.status),
        }
    }
}

/// An incoming trade request as shown to the owner of the requested item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRequestDetails {
    pub request_id: TradeRequestId,
    pub status: TradeStatus,
    pub kind: TradeKind,
    pub money_offer: Money,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub offerer: ContactCard,
    pub requested_item: ItemSnapshot,
    /// Present for item trades once the owner has selected an item.
    pub offered_item: Option<ItemSnapshot>,
    pub receiver: ContactCard,
}

impl TradeRequestDetails {
    pub(crate) fn new(
        request: &TradeRequest,
        offerer: ContactCard,
        requested_item: ItemSnapshot,
        offered_item: Option<ItemSnapshot>,
        receiver: ContactCard,
    ) -> Self {
        Self {
            request_id: record_store::Record::id(request),
            status: request.status(),
            kind: request.kind(),
            money_offer: request.money_offer(),
            message: request.message().map(str::to_string),
            created_at: request.created_at(),
            offerer,
            requested_item,
            offered_item,
            receiver,
        }
    }
}

/// A donation request together with the donation and the other party.
///
/// For incoming requests the counterpart is the requester; for sent requests
/// it is the donor, absent when the donation itself no longer resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRequestView {
    pub request_id: DonationRequestId,
    pub status: DonationRequestStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub donation: DonationSnapshot,
    pub counterpart: Option<ContactCard>,
}

impl DonationRequestView {
    pub(crate) fn new(
        request: &DonationRequest,
        donation: DonationSnapshot,
        counterpart: Option<ContactCard>,
    ) -> Self {
        Self {
            request_id: record_store::Record::id(request),
            status: request.status(),
            message: request.message().map(str::to_string),
            created_at: request.created_at(),
            donation,
            counterpart,
        }
    }
}

/// What the requester sees when confirming receipt of a donation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionDetails {
    pub request_id: DonationRequestId,
    pub request_status: DonationRequestStatus,
    pub donation: DonationSnapshot,
    pub donor: ContactCard,
}
