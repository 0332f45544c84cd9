//! Donation request service: the lifecycle engine for donations.

use std::collections::HashMap;

use common::{DonationItemId, DonationRequestId, UserId};
use record_store::{Record, RecordQuery, RecordStore, RecordStoreExt};

use crate::command::{Command, CommandHandler, CommandResult};
use crate::error::DomainError;
use crate::listing::{DonationItem, DonationStatus};
use crate::policy::LifecyclePolicy;
use crate::services::notifications::notify;
use crate::services::users::lookup;
use crate::services::{ItemCatalog, NotificationSink, ServiceError, UserDirectory};
use crate::views::{CompletionDetails, ContactCard, DonationRequestView, DonationSnapshot};

use super::{
    AcceptDonationRequest, CompleteDonationRequest, CreateDonationRequest, DonationRequest,
    DonationRequestError, RejectDonationRequest,
};

const REQUESTER_FALLBACK: &str = "Requester";

/// Service for managing donation requests.
///
/// Accept and complete move two records: the request (compare-and-swap on
/// its version) and then the donation item's status in the catalog. If the
/// catalog write fails the request is restored to its previous state.
pub struct DonationRequestService<S, C, U, N>
where
    S: RecordStore,
    C: ItemCatalog,
    U: UserDirectory,
    N: NotificationSink,
{
    handler: CommandHandler<S, DonationRequest>,
    catalog: C,
    users: U,
    notifications: N,
    policy: LifecyclePolicy,
}

impl<S, C, U, N> DonationRequestService<S, C, U, N>
where
    S: RecordStore,
    C: ItemCatalog,
    U: UserDirectory,
    N: NotificationSink,
{
    /// Creates a new donation request service.
    pub fn new(store: S, catalog: C, users: U, notifications: N, policy: LifecyclePolicy) -> Self {
        Self {
            handler: CommandHandler::new(store),
            catalog,
            users,
            notifications,
            policy,
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, DonationRequest> {
        &self.handler
    }

    /// Asks for a donation. The requester may not own it.
    #[tracing::instrument(skip(self, cmd), fields(donation_id = %cmd.donation_id, requested_by = %cmd.requested_by))]
    pub async fn create(&self, cmd: CreateDonationRequest) -> Result<DonationRequest, DomainError> {
        let donation = self.donation(cmd.donation_id).await?;

        let (request, _) = DonationRequest::create(&cmd, donation.owner_id)?;
        let stored = self.handler.create(request).await?;

        metrics::counter!("donation_requests_created_total").increment(1);
        tracing::info!(request_id = %cmd.aggregate_id(), "donation request created");

        Ok(stored.record)
    }

    /// Accepts a pending request and reserves the donation item.
    #[tracing::instrument(skip(self, cmd), fields(request_id = %cmd.request_id, owner = %cmd.owner_id))]
    pub async fn accept(
        &self,
        cmd: AcceptDonationRequest,
    ) -> Result<CommandResult<DonationRequest>, DomainError> {
        let current = self.handler.load_existing(cmd.aggregate_id()).await?.record;
        let donation = self.donation(current.donation_id()).await?;

        if !donation.is_owned_by(cmd.owner_id) {
            return Err(DomainError::Unauthorized {
                actor: cmd.owner_id,
                action: "accept this donation request",
            });
        }

        // A request that is no longer pending reports its own state first
        if current.status().can_accept() && !donation.status.is_available() {
            return Err(DonationRequestError::ItemUnavailable {
                donation_id: donation.id,
                status: donation.status,
            }
            .into());
        }

        let owner = cmd.owner_id;
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |request| request.accept(owner))
            .await?;

        if let Err(e) = self
            .catalog
            .set_donation_item_status(donation.id, DonationStatus::Active, DonationStatus::Reserved)
            .await
        {
            return Err(self.compensate(&result, e).await);
        }

        metrics::counter!("donation_requests_accepted_total").increment(1);
        tracing::info!(donation_id = %donation.id, "donation request accepted, item reserved");

        let requester = result.aggregate.requested_by();
        let name = self.requester_name(requester).await;
        notify(
            &self.notifications,
            requester,
            format!(
                "{name}, your request for \"{}\" has been accepted!",
                donation.title
            ),
        )
        .await;

        Ok(result)
    }

    /// Rejects a pending request. The donation item is left as it is.
    #[tracing::instrument(skip(self, cmd), fields(request_id = %cmd.request_id, owner = %cmd.owner_id))]
    pub async fn reject(
        &self,
        cmd: RejectDonationRequest,
    ) -> Result<CommandResult<DonationRequest>, DomainError> {
        let current = self.handler.load_existing(cmd.aggregate_id()).await?.record;
        let donation = self.donation(current.donation_id()).await?;

        if !donation.is_owned_by(cmd.owner_id) {
            return Err(DomainError::Unauthorized {
                actor: cmd.owner_id,
                action: "reject this donation request",
            });
        }

        let owner = cmd.owner_id;
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |request| request.reject(owner))
            .await?;

        metrics::counter!("donation_requests_rejected_total").increment(1);
        tracing::info!(donation_id = %donation.id, "donation request rejected");

        let requester = result.aggregate.requested_by();
        let name = self.requester_name(requester).await;
        notify(
            &self.notifications,
            requester,
            format!(
                "{name}, your request for \"{}\" has been rejected.",
                donation.title
            ),
        )
        .await;

        Ok(result)
    }

    /// Marks the donation as received and the item as donated.
    ///
    /// Only the original requester may complete.
    #[tracing::instrument(skip(self, cmd), fields(request_id = %cmd.request_id, requester = %cmd.requester_id))]
    pub async fn complete(
        &self,
        cmd: CompleteDonationRequest,
    ) -> Result<CommandResult<DonationRequest>, DomainError> {
        let current = self.handler.load_existing(cmd.aggregate_id()).await?.record;

        if current.requested_by() != cmd.requester_id {
            return Err(DomainError::Unauthorized {
                actor: cmd.requester_id,
                action: "complete this donation request",
            });
        }

        let donation = self.donation(current.donation_id()).await?;
        let require_accepted = self.policy.require_accepted_before_complete;

        if current.status().can_complete(require_accepted)
            && !donation.status.can_advance_to(DonationStatus::Donated)
        {
            return Err(DonationRequestError::ItemUnavailable {
                donation_id: donation.id,
                status: donation.status,
            }
            .into());
        }

        let requester = cmd.requester_id;
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |request| {
                request.complete(requester, require_accepted)
            })
            .await?;

        if let Err(e) = self
            .catalog
            .set_donation_item_status(donation.id, donation.status, DonationStatus::Donated)
            .await
        {
            return Err(self.compensate(&result, e).await);
        }

        metrics::counter!("donation_requests_completed_total").increment(1);
        tracing::info!(donation_id = %donation.id, "donation completed, item donated");

        let name = self.requester_name(requester).await;
        notify(
            &self.notifications,
            donation.owner_id,
            format!("{name} has received \"{}\".", donation.title),
        )
        .await;

        Ok(result)
    }

    /// Loads a donation request by ID.
    ///
    /// Returns None if the request doesn't exist.
    pub async fn get(&self, id: DonationRequestId) -> Result<Option<DonationRequest>, DomainError> {
        Ok(self.handler.load(id).await?.map(|v| v.record))
    }

    /// Requests against every donation `owner` lists, with requester details.
    #[tracing::instrument(skip(self))]
    pub async fn incoming_view(&self, owner: UserId) -> Result<Vec<DonationRequestView>, DomainError> {
        let my_donations: HashMap<DonationItemId, DonationItem> = self
            .catalog
            .list_donation_items_by_owner(owner)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        if my_donations.is_empty() {
            return Ok(Vec::new());
        }

        let requests = self
            .handler
            .store()
            .query::<DonationRequest>(
                RecordQuery::new().field_in("donation_id", my_donations.keys()),
            )
            .await?;

        let mut views = Vec::with_capacity(requests.len());
        for request in requests.into_iter().map(|v| v.record) {
            let requester = request.requested_by();
            let card = ContactCard::resolve(requester, lookup(&self.users, requester).await.as_ref());
            let donation = DonationSnapshot::resolve(
                request.donation_id(),
                my_donations.get(&request.donation_id()),
            );
            views.push(DonationRequestView::new(&request, donation, Some(card)));
        }

        Ok(views)
    }

    /// Requests `requester` has sent, with the donor's details.
    #[tracing::instrument(skip(self))]
    pub async fn sent_view(&self, requester: UserId) -> Result<Vec<DonationRequestView>, DomainError> {
        let requests = self
            .handler
            .store()
            .find_by::<DonationRequest>("requested_by", requester.to_string())
            .await?;

        let mut views = Vec::with_capacity(requests.len());
        for request in requests.into_iter().map(|v| v.record) {
            let donation = self.catalog.get_donation_item(request.donation_id()).await?;

            let donor = match &donation {
                Some(item) => Some(ContactCard::resolve(
                    item.owner_id,
                    lookup(&self.users, item.owner_id).await.as_ref(),
                )),
                None => None,
            };

            let snapshot = DonationSnapshot::resolve(request.donation_id(), donation.as_ref());
            views.push(DonationRequestView::new(&request, snapshot, donor));
        }

        Ok(views)
    }

    /// Donation and donor details for the completion screen.
    ///
    /// Does not depend on the request's status.
    #[tracing::instrument(skip(self))]
    pub async fn completion_details(
        &self,
        request_id: DonationRequestId,
    ) -> Result<CompletionDetails, DomainError> {
        let request = self.handler.load_existing(request_id).await?.record;
        let donation = self.donation(request.donation_id()).await?;

        let donor = self
            .users
            .get_user(donation.owner_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", donation.owner_id))?;

        Ok(CompletionDetails {
            request_id,
            request_status: request.status(),
            donation: DonationSnapshot::from(&donation),
            donor: ContactCard::from(&donor),
        })
    }

    async fn donation(&self, id: DonationItemId) -> Result<DonationItem, DomainError> {
        self.catalog
            .get_donation_item(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Donation item", id))
    }

    async fn requester_name(&self, requester: UserId) -> String {
        lookup(&self.users, requester)
            .await
            .map(|profile| profile.full_name)
            .unwrap_or_else(|| REQUESTER_FALLBACK.to_string())
    }

    /// Puts the request back the way it was before `result` was written.
    async fn compensate(
        &self,
        result: &CommandResult<DonationRequest>,
        cause: ServiceError,
    ) -> DomainError {
        let request_id = result.aggregate.id();
        metrics::counter!("lifecycle_compensations_total").increment(1);
        tracing::warn!(%request_id, error = %cause, "donation item update failed, restoring request");

        if let Err(e) = self
            .handler
            .restore(result.previous.clone(), result.version)
            .await
        {
            metrics::counter!("lifecycle_compensation_failures_total").increment(1);
            tracing::error!(
                %request_id,
                error = %e,
                "failed to restore donation request; request and item are inconsistent"
            );
        }

        cause.into()
    }
}
