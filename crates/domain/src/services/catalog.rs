//! Item catalog trait and record-store implementation.

use async_trait::async_trait;
use common::{DonationItemId, ItemId, UserId};
use record_store::{RecordStore, RecordStoreExt, StoreError};

use super::ServiceError;
use crate::listing::{DonationItem, DonationStatus, Item};

/// Owner of trade and donation listings.
///
/// The lifecycle engine reads listings to validate ownership and only ever
/// writes the status of a donation item.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Stores a new trade listing.
    async fn add_item(&self, item: Item) -> Result<Item, ServiceError>;

    /// Stores a new donation listing.
    async fn add_donation_item(&self, item: DonationItem) -> Result<DonationItem, ServiceError>;

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, ServiceError>;

    async fn get_donation_item(
        &self,
        id: DonationItemId,
    ) -> Result<Option<DonationItem>, ServiceError>;

    /// Moves a donation item from `from` to `to`.
    ///
    /// Fails with `StatusMismatch` if the item is no longer in `from` or if
    /// `to` would move it backwards.
    async fn set_donation_item_status(
        &self,
        id: DonationItemId,
        from: DonationStatus,
        to: DonationStatus,
    ) -> Result<DonationItem, ServiceError>;

    async fn list_items_by_owner(&self, owner: UserId) -> Result<Vec<Item>, ServiceError>;

    async fn list_donation_items_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<DonationItem>, ServiceError>;
}

/// Item catalog kept in a record store.
#[derive(Debug, Clone)]
pub struct RecordItemCatalog<S> {
    store: S,
}

impl<S: RecordStore> RecordItemCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

fn duplicate(err: StoreError) -> ServiceError {
    match err {
        StoreError::AlreadyExists { kind, id } => ServiceError::Duplicate(format!("{kind} {id}")),
        other => other.into(),
    }
}

#[async_trait]
impl<S: RecordStore> ItemCatalog for RecordItemCatalog<S> {
    async fn add_item(&self, item: Item) -> Result<Item, ServiceError> {
        let stored = self.store.insert(item).await.map_err(duplicate)?;
        Ok(stored.record)
    }

    async fn add_donation_item(&self, item: DonationItem) -> Result<DonationItem, ServiceError> {
        let stored = self.store.insert(item).await.map_err(duplicate)?;
        Ok(stored.record)
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, ServiceError> {
        Ok(self.store.get::<Item>(id).await?.map(|v| v.record))
    }

    async fn get_donation_item(
        &self,
        id: DonationItemId,
    ) -> Result<Option<DonationItem>, ServiceError> {
        Ok(self.store.get::<DonationItem>(id).await?.map(|v| v.record))
    }

    async fn set_donation_item_status(
        &self,
        id: DonationItemId,
        from: DonationStatus,
        to: DonationStatus,
    ) -> Result<DonationItem, ServiceError> {
        let current = self
            .store
            .get::<DonationItem>(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("donation item {id}")))?;

        if current.record.status != from || !from.can_advance_to(to) {
            return Err(ServiceError::StatusMismatch {
                expected: from.to_string(),
                actual: current.record.status.to_string(),
            });
        }

        let mut item = current.record;
        item.status = to;

        match self.store.update(item, current.version).await {
            Ok(stored) => {
                tracing::debug!(%id, %from, %to, "donation item status changed");
                Ok(stored.record)
            }
            // Someone else moved the item between our read and write
            Err(StoreError::ConcurrencyConflict { .. }) => {
                let actual = self
                    .store
                    .get::<DonationItem>(id)
                    .await?
                    .map(|v| v.record.status.to_string())
                    .unwrap_or_else(|| "MISSING".to_string());
                Err(ServiceError::StatusMismatch {
                    expected: from.to_string(),
                    actual,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_items_by_owner(&self, owner: UserId) -> Result<Vec<Item>, ServiceError> {
        let items = self.store.find_by::<Item>("owner_id", owner.to_string()).await?;
        Ok(items.into_iter().map(|v| v.record).collect())
    }

    async fn list_donation_items_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<DonationItem>, ServiceError> {
        let items = self
            .store
            .find_by::<DonationItem>("owner_id", owner.to_string())
            .await?;
        Ok(items.into_iter().map(|v| v.record).collect())
    }
}
