//! Trade request aggregate implementation.

use chrono::{DateTime, Utc};
use common::{ItemId, TradeRequestId, UserId};
use record_store::Record;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::value_objects::Money;

use super::{
    CreateTradeRequest, TradeKind, TradeRequestError, TradeRequestEvent, TradeStatus,
    events::TradeRequestCreatedData,
};

/// Trade request aggregate root.
///
/// An offer against another user's item. It is created PENDING and
/// decided exactly once by the owner of the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    id: TradeRequestId,
    item_id: ItemId,
    offered_by: UserId,
    kind: TradeKind,
    money_offer: Money,
    message: Option<String>,
    receiver_selected_item_id: Option<ItemId>,
    status: TradeStatus,
    created_at: DateTime<Utc>,
    decided_by: Option<UserId>,
    decided_at: Option<DateTime<Utc>>,
}

impl Record for TradeRequest {
    type Id = TradeRequestId;
    const KIND: &'static str = "TradeRequest";

    fn id(&self) -> TradeRequestId {
        self.id
    }
}

impl Aggregate for TradeRequest {
    type Event = TradeRequestEvent;
    type Error = TradeRequestError;
    const LABEL: &'static str = "Trade request";

    fn apply(&mut self, event: Self::Event) {
        match event {
            TradeRequestEvent::Created(data) => self.apply_created(data),
            TradeRequestEvent::Accepted(data) => {
                self.status = TradeStatus::Accepted;
                self.receiver_selected_item_id = data.selected_item_id;
                self.decided_by = Some(data.approver_id);
                self.decided_at = Some(data.accepted_at);
            }
            TradeRequestEvent::Rejected(data) => {
                self.status = TradeStatus::Rejected;
                self.decided_by = Some(data.rejecter_id);
                self.decided_at = Some(data.rejected_at);
            }
        }
    }
}

// Query methods
impl TradeRequest {
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn offered_by(&self) -> UserId {
        self.offered_by
    }

    pub fn kind(&self) -> TradeKind {
        self.kind
    }

    pub fn money_offer(&self) -> Money {
        self.money_offer
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The offerer's item chosen by the owner when accepting an item trade.
    pub fn receiver_selected_item_id(&self) -> Option<ItemId> {
        self.receiver_selected_item_id
    }

    pub fn status(&self) -> TradeStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The user who accepted or rejected the request.
    pub fn decided_by(&self) -> Option<UserId> {
        self.decided_by
    }

    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }
}

// Command methods (return events)
impl TradeRequest {
    /// Builds a new PENDING request from a create command.
    ///
    /// Returns the request together with the event that produced it.
    pub fn create(
        cmd: &CreateTradeRequest,
    ) -> Result<(TradeRequest, TradeRequestEvent), TradeRequestError> {
        let kind = cmd.kind.unwrap_or_default();
        let money_offer = match kind {
            TradeKind::Money => cmd.money_offer.unwrap_or_default(),
            TradeKind::Item => Money::zero(),
        };

        if money_offer.is_negative() {
            return Err(TradeRequestError::NegativeMoneyOffer {
                cents: money_offer.cents(),
            });
        }

        let event = TradeRequestEvent::created(
            cmd.request_id,
            cmd.item_id,
            cmd.offered_by,
            kind,
            money_offer,
            cmd.message.clone(),
        );

        let mut request = TradeRequest::default();
        request.apply(event.clone());
        Ok((request, event))
    }

    /// Accepts the request, recording the item selected in return.
    pub fn accept(
        &self,
        approver_id: UserId,
        selected_item_id: Option<ItemId>,
    ) -> Result<Vec<TradeRequestEvent>, TradeRequestError> {
        if !self.status.can_accept() {
            return Err(TradeRequestError::InvalidStateTransition {
                current_state: self.status,
                action: "accept",
            });
        }

        if selected_item_id.is_some() && self.kind == TradeKind::Money {
            return Err(TradeRequestError::SelectionOnMoneyTrade);
        }

        Ok(vec![TradeRequestEvent::accepted(
            approver_id,
            selected_item_id,
        )])
    }

    /// Rejects the request.
    pub fn reject(&self, rejecter_id: UserId) -> Result<Vec<TradeRequestEvent>, TradeRequestError> {
        if !self.status.can_reject() {
            return Err(TradeRequestError::InvalidStateTransition {
                current_state: self.status,
                action: "reject",
            });
        }

        Ok(vec![TradeRequestEvent::rejected(rejecter_id)])
    }
}

// Event application helpers
impl TradeRequest {
    fn apply_created(&mut self, data: TradeRequestCreatedData) {
        self.id = data.request_id;
        self.item_id = data.item_id;
        self.offered_by = data.offered_by;
        self.kind = data.kind;
        self.money_offer = data.money_offer;
        self.message = data.message;
        self.receiver_selected_item_id = None;
        self.status = TradeStatus::Pending;
        self.created_at = data.created_at;
    }
}
