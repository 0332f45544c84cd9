//! Ratings attached to donation requests.
//!
//! The ratee is never supplied by the caller. It is derived from the owner of
//! the donated item, so a requester can only rate the donor they dealt with.

use chrono::Utc;
use common::{DonationRequestId, RatingId, UserId};
use record_store::{RecordStore, RecordStoreExt};

use crate::donation::{DonationRequest, DonationRequestError, DonationRequestStatus};
use crate::error::DomainError;
use crate::policy::LifecyclePolicy;
use crate::services::{ItemCatalog, Rating, RatingLedger};
use crate::value_objects::Score;

/// Input for [`RatingService::rate`].
#[derive(Debug, Clone)]
pub struct RateDonation {
    pub donation_request_id: DonationRequestId,
    pub rater_id: UserId,
    pub score: u8,
    pub comment: Option<String>,
}

impl RateDonation {
    pub fn new(donation_request_id: DonationRequestId, rater_id: UserId, score: u8) -> Self {
        Self {
            donation_request_id,
            rater_id,
            score,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

pub struct RatingService<S, C, L>
where
    S: RecordStore,
    C: ItemCatalog,
    L: RatingLedger,
{
    store: S,
    catalog: C,
    ledger: L,
    policy: LifecyclePolicy,
}

impl<S, C, L> RatingService<S, C, L>
where
    S: RecordStore,
    C: ItemCatalog,
    L: RatingLedger,
{
    pub fn new(store: S, catalog: C, ledger: L, policy: LifecyclePolicy) -> Self {
        Self {
            store,
            catalog,
            ledger,
            policy,
        }
    }

    /// Records a rating from the requester of a donation for its donor.
    #[tracing::instrument(skip(self, input), fields(request_id = %input.donation_request_id, rater = %input.rater_id))]
    pub async fn rate(&self, input: RateDonation) -> Result<Rating, DomainError> {
        let score = Score::new(input.score).ok_or_else(|| {
            DomainError::InvalidOperation(format!(
                "score must be between {} and {}, got {}",
                Score::MIN,
                Score::MAX,
                input.score
            ))
        })?;

        let request = self
            .store
            .get::<DonationRequest>(input.donation_request_id)
            .await?
            .map(|v| v.record)
            .ok_or_else(|| DomainError::not_found("Donation request", input.donation_request_id))?;

        if request.requested_by() != input.rater_id {
            return Err(DomainError::Unauthorized {
                actor: input.rater_id,
                action: "rate this donation",
            });
        }

        if self.policy.require_completed_before_rating
            && request.status() != DonationRequestStatus::Completed
        {
            return Err(DonationRequestError::NotCompleted {
                current_state: request.status(),
            }
            .into());
        }

        let donation = self
            .catalog
            .get_donation_item(request.donation_id())
            .await?
            .ok_or_else(|| DomainError::not_found("Donation item", request.donation_id()))?;

        let id = if self.policy.unique_rating_per_request {
            let existing = self
                .ledger
                .find_by_donation_request(input.donation_request_id)
                .await?;
            if !existing.is_empty() {
                return Err(DomainError::InvalidOperation(format!(
                    "donation request {} has already been rated",
                    input.donation_request_id
                )));
            }
            // One rating id per request lets the ledger reject a racing duplicate
            RatingId::from_uuid(input.donation_request_id.as_uuid())
        } else {
            RatingId::new()
        };

        let rating = self
            .ledger
            .save(Rating {
                id,
                donation_request_id: input.donation_request_id,
                rater_id: input.rater_id,
                ratee_id: donation.owner_id,
                score,
                comment: input.comment,
                created_at: Utc::now(),
            })
            .await?;

        metrics::counter!("ratings_recorded_total").increment(1);
        tracing::info!(ratee = %rating.ratee_id, score = %rating.score, "rating recorded");

        Ok(rating)
    }

    /// All ratings received by `user`.
    pub async fn ratings_for_user(&self, user: UserId) -> Result<Vec<Rating>, DomainError> {
        Ok(self.ledger.find_by_ratee(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donation::CreateDonationRequest;
    use crate::listing::DonationItem;
    use crate::services::{RecordItemCatalog, RecordRatingLedger};
    use record_store::InMemoryRecordStore;

    struct Fixture {
        service: RatingService<InMemoryRecordStore, RecordItemCatalog<InMemoryRecordStore>, RecordRatingLedger<InMemoryRecordStore>>,
        store: InMemoryRecordStore,
        donor: UserId,
        requester: UserId,
        request_id: DonationRequestId,
    }

    async fn fixture(policy: LifecyclePolicy) -> Fixture {
        let store = InMemoryRecordStore::new();
        let catalog = RecordItemCatalog::new(store.clone());
        let donor = UserId::new();
        let requester = UserId::new();

        let donation = catalog
            .add_donation_item(DonationItem::new(donor, "Bookshelf"))
            .await
            .unwrap();
        let cmd = CreateDonationRequest::new(donation.id, requester);
        let (request, _) = DonationRequest::create(&cmd, donor).unwrap();
        store.insert(request).await.unwrap();

        Fixture {
            service: RatingService::new(
                store.clone(),
                catalog,
                RecordRatingLedger::new(store.clone()),
                policy,
            ),
            store,
            donor,
            requester,
            request_id: cmd.request_id,
        }
    }

    #[tokio::test]
    async fn ratee_is_the_donor() {
        let f = fixture(LifecyclePolicy::default()).await;

        let rating = f
            .service
            .rate(RateDonation::new(f.request_id, f.requester, 5).with_comment("thanks"))
            .await
            .unwrap();

        assert_eq!(rating.ratee_id, f.donor);
        assert_eq!(rating.rater_id, f.requester);
        assert_eq!(rating.comment.as_deref(), Some("thanks"));

        let received = f.service.ratings_for_user(f.donor).await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(f.service.ratings_for_user(f.requester).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn score_out_of_range_is_rejected() {
        let f = fixture(LifecyclePolicy::default()).await;
        for score in [0, 6] {
            let err = f
                .service
                .rate(RateDonation::new(f.request_id, f.requester, score))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidOperation(_)));
        }
    }

    #[tokio::test]
    async fn only_the_requester_can_rate() {
        let f = fixture(LifecyclePolicy::default()).await;
        let err = f
            .service
            .rate(RateDonation::new(f.request_id, f.donor, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn second_rating_is_rejected_by_default() {
        let f = fixture(LifecyclePolicy::default()).await;
        f.service
            .rate(RateDonation::new(f.request_id, f.requester, 4))
            .await
            .unwrap();

        let err = f
            .service
            .rate(RateDonation::new(f.request_id, f.requester, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn duplicates_allowed_when_uniqueness_is_off() {
        let policy = LifecyclePolicy {
            unique_rating_per_request: false,
            ..LifecyclePolicy::default()
        };
        let f = fixture(policy).await;

        for score in [4, 2] {
            f.service
                .rate(RateDonation::new(f.request_id, f.requester, score))
                .await
                .unwrap();
        }
        assert_eq!(f.service.ratings_for_user(f.donor).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn completion_required_when_policy_says_so() {
        let policy = LifecyclePolicy {
            require_completed_before_rating: true,
            ..LifecyclePolicy::default()
        };
        let f = fixture(policy).await;

        let err = f
            .service
            .rate(RateDonation::new(f.request_id, f.requester, 5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Donation(DonationRequestError::NotCompleted {
                current_state: DonationRequestStatus::Pending
            })
        ));
        assert!(f.store.exists::<DonationRequest>(f.request_id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_request_is_not_found() {
        let f = fixture(LifecyclePolicy::default()).await;
        let err = f
            .service
            .rate(RateDonation::new(DonationRequestId::new(), f.requester, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Donation request", .. }));
    }
}
