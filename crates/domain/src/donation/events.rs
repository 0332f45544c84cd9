//! Donation request domain events.

use chrono::{DateTime, Utc};
use common::{DonationItemId, DonationRequestId, UserId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events that can occur on a donation request aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DonationRequestEvent {
    Created(DonationRequestCreatedData),
    Accepted(DonationRequestDecidedData),
    Rejected(DonationRequestDecidedData),
    Completed(DonationRequestCompletedData),
}

impl DomainEvent for DonationRequestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DonationRequestEvent::Created(_) => "DonationRequestCreated",
            DonationRequestEvent::Accepted(_) => "DonationRequestAccepted",
            DonationRequestEvent::Rejected(_) => "DonationRequestRejected",
            DonationRequestEvent::Completed(_) => "DonationRequestCompleted",
        }
    }
}

/// Data for the Created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRequestCreatedData {
    pub request_id: DonationRequestId,
    pub donation_id: DonationItemId,
    pub requested_by: UserId,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for the Accepted and Rejected events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRequestDecidedData {
    /// The donor who made the decision.
    pub owner_id: UserId,
    pub decided_at: DateTime<Utc>,
}

/// Data for the Completed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRequestCompletedData {
    pub requester_id: UserId,
    pub completed_at: DateTime<Utc>,
}

// Convenience constructors for events
impl DonationRequestEvent {
    pub fn created(
        request_id: DonationRequestId,
        donation_id: DonationItemId,
        requested_by: UserId,
        message: Option<String>,
    ) -> Self {
        DonationRequestEvent::Created(DonationRequestCreatedData {
            request_id,
            donation_id,
            requested_by,
            message,
            created_at: Utc::now(),
        })
    }

    pub fn accepted(owner_id: UserId) -> Self {
        DonationRequestEvent::Accepted(DonationRequestDecidedData {
            owner_id,
            decided_at: Utc::now(),
        })
    }

    pub fn rejected(owner_id: UserId) -> Self {
        DonationRequestEvent::Rejected(DonationRequestDecidedData {
            owner_id,
            decided_at: Utc::now(),
        })
    }

    pub fn completed(requester_id: UserId) -> Self {
        DonationRequestEvent::Completed(DonationRequestCompletedData {
            requester_id,
            completed_at: Utc::now(),
        })
    }
}
