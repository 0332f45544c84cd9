//! Trade request domain events.

use chrono::{DateTime, Utc};
use common::{ItemId, TradeRequestId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::value_objects::Money;

use super::TradeKind;

/// Events that can occur on a trade request aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TradeRequestEvent {
    /// An offer was made against an item.
    Created(TradeRequestCreatedData),

    /// The item owner accepted the offer.
    Accepted(TradeRequestAcceptedData),

    /// The item owner declined the offer.
    Rejected(TradeRequestRejectedData),
}

impl DomainEvent for TradeRequestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TradeRequestEvent::Created(_) => "TradeRequestCreated",
            TradeRequestEvent::Accepted(_) => "TradeRequestAccepted",
            TradeRequestEvent::Rejected(_) => "TradeRequestRejected",
        }
    }
}

/// Data for the Created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequestCreatedData {
    pub request_id: TradeRequestId,
    pub item_id: ItemId,
    pub offered_by: UserId,
    pub kind: TradeKind,
    pub money_offer: Money,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for the Accepted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequestAcceptedData {
    pub approver_id: UserId,

    /// The offerer's item picked by the owner, for item-for-item trades.
    pub selected_item_id: Option<ItemId>,

    pub accepted_at: DateTime<Utc>,
}

/// Data for the Rejected event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequestRejectedData {
    pub rejecter_id: UserId,
    pub rejected_at: DateTime<Utc>,
}

// Convenience constructors for events
impl TradeRequestEvent {
    pub fn created(
        request_id: TradeRequestId,
        item_id: ItemId,
        offered_by: UserId,
        kind: TradeKind,
        money_offer: Money,
        message: Option<String>,
    ) -> Self {
        TradeRequestEvent::Created(TradeRequestCreatedData {
            request_id,
            item_id,
            offered_by,
            kind,
            money_offer,
            message,
            created_at: Utc::now(),
        })
    }

    pub fn accepted(approver_id: UserId, selected_item_id: Option<ItemId>) -> Self {
        TradeRequestEvent::Accepted(TradeRequestAcceptedData {
            approver_id,
            selected_item_id,
            accepted_at: Utc::now(),
        })
    }

    pub fn rejected(rejecter_id: UserId) -> Self {
        TradeRequestEvent::Rejected(TradeRequestRejectedData {
            rejecter_id,
            rejected_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = TradeRequestEvent::created(
            TradeRequestId::new(),
            ItemId::new(),
            UserId::new(),
            TradeKind::Money,
            Money::from_dollars(10),
            None,
        );
        assert_eq!(event.event_type(), "TradeRequestCreated");
        assert_eq!(
            TradeRequestEvent::accepted(UserId::new(), None).event_type(),
            "TradeRequestAccepted"
        );
        assert_eq!(
            TradeRequestEvent::rejected(UserId::new()).event_type(),
            "TradeRequestRejected"
        );
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = TradeRequestEvent::accepted(UserId::new(), Some(ItemId::new()));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Accepted");
        assert!(json["data"]["selected_item_id"].is_string());
    }
}
