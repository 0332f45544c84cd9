//! Rating ledger trait and record-store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{DonationRequestId, RatingId, UserId};
use record_store::{Record, RecordStore, RecordStoreExt, StoreError};
use serde::{Deserialize, Serialize};

use super::ServiceError;
use crate::value_objects::Score;

/// A score left by a requester for the donor of a donation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub donation_request_id: DonationRequestId,
    pub rater_id: UserId,
    /// Always the owner of the donated item.
    pub ratee_id: UserId,
    pub score: Score,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Rating {
    type Id = RatingId;
    const KIND: &'static str = "Rating";

    fn id(&self) -> RatingId {
        self.id
    }
}

#[async_trait]
pub trait RatingLedger: Send + Sync {
    /// Persists a rating. Fails with `Duplicate` if its id is taken.
    async fn save(&self, rating: Rating) -> Result<Rating, ServiceError>;

    async fn find_by_ratee(&self, ratee: UserId) -> Result<Vec<Rating>, ServiceError>;

    async fn find_by_donation_request(
        &self,
        request: DonationRequestId,
    ) -> Result<Vec<Rating>, ServiceError>;
}

/// Rating ledger kept in a record store.
#[derive(Debug, Clone)]
pub struct RecordRatingLedger<S> {
    store: S,
}

impl<S: RecordStore> RecordRatingLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: RecordStore> RatingLedger for RecordRatingLedger<S> {
    async fn save(&self, rating: Rating) -> Result<Rating, ServiceError> {
        match self.store.insert(rating).await {
            Ok(stored) => Ok(stored.record),
            Err(StoreError::AlreadyExists { id, .. }) => {
                Err(ServiceError::Duplicate(format!("rating {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_ratee(&self, ratee: UserId) -> Result<Vec<Rating>, ServiceError> {
        let ratings = self
            .store
            .find_by::<Rating>("ratee_id", ratee.to_string())
            .await?;
        Ok(ratings.into_iter().map(|v| v.record).collect())
    }

    async fn find_by_donation_request(
        &self,
        request: DonationRequestId,
    ) -> Result<Vec<Rating>, ServiceError> {
        let ratings = self
            .store
            .find_by::<Rating>("donation_request_id", request.to_string())
            .await?;
        Ok(ratings.into_iter().map(|v| v.record).collect())
    }
}
