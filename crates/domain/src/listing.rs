//! Listings owned by the item catalog: trade items and donation items.

use chrono::{DateTime, Utc};
use common::{DonationItemId, ItemId, UserId};
use record_store::Record;
use serde::{Deserialize, Serialize};

use crate::value_objects::Money;

/// Status of a trade item listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "ACTIVE",
            ItemStatus::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An item listed for trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub category_id: Option<i64>,
    pub owner_id: UserId,
    pub status: ItemStatus,
    /// Image references in display order.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Creates a new active listing with a fresh id.
    pub fn new(owner_id: UserId, title: impl Into<String>, price: Money) -> Self {
        Self {
            id: ItemId::new(),
            title: title.into(),
            description: String::new(),
            price,
            category_id: None,
            owner_id,
            status: ItemStatus::Active,
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

impl Record for Item {
    type Id = ItemId;
    const KIND: &'static str = "Item";

    fn id(&self) -> ItemId {
        self.id
    }
}

/// The status of a donation item.
///
/// Status only moves forward:
/// ```text
/// Active ──► Reserved ──► Donated
/// ```
/// Reserved is entered when a request is accepted, Donated when it is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    #[default]
    Active,
    Reserved,
    Donated,
}

impl DonationStatus {
    fn rank(&self) -> u8 {
        match self {
            DonationStatus::Active => 0,
            DonationStatus::Reserved => 1,
            DonationStatus::Donated => 2,
        }
    }

    /// Returns true if moving to `next` keeps the progression forward.
    pub fn can_advance_to(&self, next: DonationStatus) -> bool {
        next.rank() > self.rank()
    }

    /// Returns true if the item can still be reserved by an accepted request.
    pub fn is_available(&self) -> bool {
        matches!(self, DonationStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Active => "ACTIVE",
            DonationStatus::Reserved => "RESERVED",
            DonationStatus::Donated => "DONATED",
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An item offered for free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationItem {
    pub id: DonationItemId,
    pub title: String,
    pub description: String,
    pub owner_id: UserId,
    pub status: DonationStatus,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DonationItem {
    /// Creates a new active donation listing with a fresh id.
    pub fn new(owner_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: DonationItemId::new(),
            title: title.into(),
            description: String::new(),
            owner_id,
            status: DonationStatus::Active,
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }
}

impl Record for DonationItem {
    type Id = DonationItemId;
    const KIND: &'static str = "DonationItem";

    fn id(&self) -> DonationItemId {
        self.id
    }
}
