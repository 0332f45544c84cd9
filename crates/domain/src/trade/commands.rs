//! Trade request commands.

use common::{ItemId, TradeRequestId, UserId};

use crate::command::Command;
use crate::value_objects::Money;

use super::{TradeKind, TradeRequest};

/// Command to make an offer against an item.
#[derive(Debug, Clone)]
pub struct CreateTradeRequest {
    /// The id the new request will be stored under.
    pub request_id: TradeRequestId,

    /// The item being asked for.
    pub item_id: ItemId,

    /// The user making the offer.
    pub offered_by: UserId,

    /// Defaults to [`TradeKind::Money`].
    pub kind: Option<TradeKind>,

    /// Defaults to zero, and is forced to zero for item trades.
    pub money_offer: Option<Money>,

    pub message: Option<String>,
}

impl CreateTradeRequest {
    /// Creates a command with a generated request id and default terms.
    pub fn new(item_id: ItemId, offered_by: UserId) -> Self {
        Self {
            request_id: TradeRequestId::new(),
            item_id,
            offered_by,
            kind: None,
            money_offer: None,
            message: None,
        }
    }

    /// Makes this a money offer of the given amount.
    pub fn money(mut self, amount: Money) -> Self {
        self.kind = Some(TradeKind::Money);
        self.money_offer = Some(amount);
        self
    }

    /// Makes this an item-for-item offer.
    pub fn item_swap(mut self) -> Self {
        self.kind = Some(TradeKind::Item);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Command for CreateTradeRequest {
    type Aggregate = TradeRequest;

    fn aggregate_id(&self) -> TradeRequestId {
        self.request_id
    }
}

/// Command to accept a pending trade request.
#[derive(Debug, Clone)]
pub struct AcceptTradeRequest {
    pub request_id: TradeRequestId,

    /// The user accepting; must own the requested item.
    pub approver_id: UserId,

    /// For item trades, the offerer's item the approver wants in return.
    pub selected_item_id: Option<ItemId>,
}

impl AcceptTradeRequest {
    pub fn new(request_id: TradeRequestId, approver_id: UserId) -> Self {
        Self {
            request_id,
            approver_id,
            selected_item_id: None,
        }
    }

    pub fn selecting(mut self, item_id: ItemId) -> Self {
        self.selected_item_id = Some(item_id);
        self
    }
}

impl Command for AcceptTradeRequest {
    type Aggregate = TradeRequest;

    fn aggregate_id(&self) -> TradeRequestId {
        self.request_id
    }
}

/// Command to reject a pending trade request.
#[derive(Debug, Clone)]
pub struct RejectTradeRequest {
    pub request_id: TradeRequestId,
    pub rejecter_id: UserId,
}

impl RejectTradeRequest {
    pub fn new(request_id: TradeRequestId, rejecter_id: UserId) -> Self {
        Self {
            request_id,
            rejecter_id,
        }
    }
}

impl Command for RejectTradeRequest {
    type Aggregate = TradeRequest;

    fn aggregate_id(&self) -> TradeRequestId {
        self.request_id
    }
}
