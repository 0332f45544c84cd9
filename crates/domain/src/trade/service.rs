//! Trade request service: the lifecycle engine for trade offers.

use std::collections::HashMap;

use common::{ItemId, TradeRequestId, UserId};
use record_store::{Record, RecordQuery, RecordStore, RecordStoreExt};

use crate::command::{Command, CommandHandler, CommandResult};
use crate::error::DomainError;
use crate::listing::Item;
use crate::policy::LifecyclePolicy;
use crate::services::notifications::notify;
use crate::services::users::lookup;
use crate::services::{ItemCatalog, NotificationSink, UserDirectory};
use crate::views::{ContactCard, ItemSnapshot, TradeRequestDetails};

use super::{
    AcceptTradeRequest, CreateTradeRequest, RejectTradeRequest, TradeKind, TradeRequest,
};

const SENDER_FALLBACK: &str = "Sender";

/// Service for managing trade requests.
///
/// Wraps the command handler and enforces the rules that need the item
/// catalog: the requested item must exist, only its owner may decide, and a
/// selected item must belong to the offerer.
pub struct TradeRequestService<S, C, U, N>
where
    S: RecordStore,
    C: ItemCatalog,
    U: UserDirectory,
    N: NotificationSink,
{
    handler: CommandHandler<S, TradeRequest>,
    catalog: C,
    users: U,
    notifications: N,
    policy: LifecyclePolicy,
}

impl<S, C, U, N> TradeRequestService<S, C, U, N>
where
    S: RecordStore,
    C: ItemCatalog,
    U: UserDirectory,
    N: NotificationSink,
{
    /// Creates a new trade request service.
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
    pub fn handler(&self) -> &CommandHandler<S, TradeRequest> {
        &self.handler
    }

    /// Makes an offer against an item.
    #[tracing::instrument(skip(self, cmd), fields(item_id = %cmd.item_id, offered_by = %cmd.offered_by))]
    pub async fn create(&self, cmd: CreateTradeRequest) -> Result<TradeRequest, DomainError> {
        if self.catalog.get_item(cmd.item_id).await?.is_none() {
            return Err(DomainError::not_found("Item", cmd.item_id));
        }

        let (request, _) = TradeRequest::create(&cmd)?;
        let stored = self.handler.create(request).await?;

        metrics::counter!("trade_requests_created_total").increment(1);
        tracing::info!(request_id = %cmd.aggregate_id(), kind = %stored.record.kind(), "trade request created");

        Ok(stored.record)
    }

    /// Accepts a pending request and notifies the offerer.
    #[tracing::instrument(skip(self, cmd), fields(request_id = %cmd.request_id, approver = %cmd.approver_id))]
    pub async fn accept(
        &self,
        cmd: AcceptTradeRequest,
    ) -> Result<CommandResult<TradeRequest>, DomainError> {
        let current = self.handler.load_existing(cmd.aggregate_id()).await?.record;
        self.verify_owner(&current, cmd.approver_id, "accept this trade request")
            .await?;

        // A decided request reports its own state before any selection error
        if current.status().can_accept()
            && let Some(selected) = cmd.selected_item_id
        {
            self.verify_selection(&current, selected).await?;
        }

        let approver = cmd.approver_id;
        let selected = cmd.selected_item_id;
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |request| request.accept(approver, selected))
            .await?;

        metrics::counter!("trade_requests_accepted_total").increment(1);
        tracing::info!(offered_by = %result.aggregate.offered_by(), "trade request accepted");

        let offerer = result.aggregate.offered_by();
        let name = self.offerer_name(offerer).await;
        notify(
            &self.notifications,
            offerer,
            format!("{name}, your trade request has been accepted!"),
        )
        .await;

        Ok(result)
    }

    /// Rejects a pending request and notifies the offerer.
    #[tracing::instrument(skip(self, cmd), fields(request_id = %cmd.request_id, rejecter = %cmd.rejecter_id))]
    pub async fn reject(
        &self,
        cmd: RejectTradeRequest,
    ) -> Result<CommandResult<TradeRequest>, DomainError> {
        let current = self.handler.load_existing(cmd.aggregate_id()).await?.record;
        self.verify_owner(&current, cmd.rejecter_id, "reject this trade request")
            .await?;

        let rejecter = cmd.rejecter_id;
        let result = self
            .handler
            .execute(cmd.aggregate_id(), |request| request.reject(rejecter))
            .await?;

        metrics::counter!("trade_requests_rejected_total").increment(1);
        tracing::info!(offered_by = %result.aggregate.offered_by(), "trade request rejected");

        let offerer = result.aggregate.offered_by();
        let name = self.offerer_name(offerer).await;
        notify(
            &self.notifications,
            offerer,
            format!("{name}, your trade request has been rejected."),
        )
        .await;

        Ok(result)
    }

    /// Loads a trade request by ID.
    ///
    /// Returns None if the request doesn't exist.
    pub async fn get(
        &self,
        id: TradeRequestId,
    ) -> Result<Option<TradeRequest>, DomainError> {
        Ok(self.handler.load(id).await?.map(|v| v.record))
    }

    /// Incoming requests against the items `owner` lists, optionally
    /// filtered by status name (case-insensitive). An empty filter matches
    /// everything.
    #[tracing::instrument(skip(self))]
    pub async fn detailed_view(
        &self,
        owner: UserId,
        status: Option<&str>,
    ) -> Result<Vec<TradeRequestDetails>, DomainError> {
        let my_items: HashMap<ItemId, Item> = self
            .catalog
            .list_items_by_owner(owner)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        if my_items.is_empty() {
            return Ok(Vec::new());
        }

        let requests = self
            .handler
            .store()
            .query::<TradeRequest>(RecordQuery::new().field_in("item_id", my_items.keys()))
            .await?;

        let status = status.map(str::trim).filter(|s| !s.is_empty());
        let receiver = ContactCard::resolve(owner, lookup(&self.users, owner).await.as_ref());

        let mut details = Vec::new();
        for request in requests.into_iter().map(|v| v.record) {
            if let Some(filter) = status
                && !request.status().matches(filter)
            {
                continue;
            }

            let offerer = ContactCard::resolve(
                request.offered_by(),
                lookup(&self.users, request.offered_by()).await.as_ref(),
            );
            let requested_item =
                ItemSnapshot::resolve(request.item_id(), my_items.get(&request.item_id()));

            let offered_item = match (request.kind(), request.receiver_selected_item_id()) {
                (TradeKind::Item, Some(selected)) => {
                    let item = self.catalog.get_item(selected).await?;
                    Some(ItemSnapshot::resolve(selected, item.as_ref()))
                }
                _ => None,
            };

            details.push(TradeRequestDetails::new(
                &request,
                offerer,
                requested_item,
                offered_item,
                receiver.clone(),
            ));
        }

        Ok(details)
    }

    /// Public listing snapshot of everything a user owns.
    #[tracing::instrument(skip(self))]
    pub async fn items_by_owner(&self, user: UserId) -> Result<Vec<ItemSnapshot>, DomainError> {
        let items = self.catalog.list_items_by_owner(user).await?;
        Ok(items.iter().map(ItemSnapshot::from).collect())
    }

    async fn verify_owner(
        &self,
        request: &TradeRequest,
        actor: UserId,
        action: &'static str,
    ) -> Result<(), DomainError> {
        if !self.policy.verify_trade_owner {
            return Ok(());
        }

        let item = self
            .catalog
            .get_item(request.item_id())
            .await?
            .ok_or_else(|| DomainError::not_found("Item", request.item_id()))?;

        if !item.is_owned_by(actor) {
            tracing::warn!(request_id = %request.id(), %actor, "caller does not own the requested item");
            return Err(DomainError::Unauthorized { actor, action });
        }
        Ok(())
    }

    async fn verify_selection(
        &self,
        request: &TradeRequest,
        selected: ItemId,
    ) -> Result<(), DomainError> {
        if request.kind() != TradeKind::Item {
            return Err(super::TradeRequestError::SelectionOnMoneyTrade.into());
        }

        let item = self
            .catalog
            .get_item(selected)
            .await?
            .ok_or_else(|| DomainError::not_found("Item", selected))?;

        if !item.is_owned_by(request.offered_by()) {
            return Err(DomainError::InvalidOperation(format!(
                "selected item {selected} does not belong to the offerer"
            )));
        }
        Ok(())
    }

    async fn offerer_name(&self, offerer: UserId) -> String {
        lookup(&self.users, offerer)
            .await
            .map(|profile| profile.full_name)
            .unwrap_or_else(|| SENDER_FALLBACK.to_string())
    }
}
