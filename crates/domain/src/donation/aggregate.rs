//! Donation request aggregate implementation.

use chrono::{DateTime, Utc};
use common::{DonationItemId, DonationRequestId, UserId};
use record_store::Record;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{
    CreateDonationRequest, DonationRequestError, DonationRequestEvent, DonationRequestStatus,
};

/// Donation request aggregate root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationRequest {
    id: DonationRequestId,
    donation_id: DonationItemId,
    requested_by: UserId,
    message: Option<String>,
    status: DonationRequestStatus,
    created_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Record for DonationRequest {
    type Id = DonationRequestId;
    const KIND: &'static str = "DonationRequest";

    fn id(&self) -> DonationRequestId {
        self.id
    }
}

impl Aggregate for DonationRequest {
    type Event = DonationRequestEvent;
    type Error = DonationRequestError;
    const LABEL: &'static str = "Donation request";

    fn apply(&mut self, event: Self::Event) {
        match event {
            DonationRequestEvent::Created(data) => {
                self.id = data.request_id;
                self.donation_id = data.donation_id;
                self.requested_by = data.requested_by;
                self.message = data.message;
                self.status = DonationRequestStatus::Pending;
                self.created_at = data.created_at;
            }
            DonationRequestEvent::Accepted(data) => {
                self.status = DonationRequestStatus::Accepted;
                self.decided_at = Some(data.decided_at);
            }
            DonationRequestEvent::Rejected(data) => {
                self.status = DonationRequestStatus::Rejected;
                self.decided_at = Some(data.decided_at);
            }
            DonationRequestEvent::Completed(data) => {
                self.status = DonationRequestStatus::Completed;
                self.completed_at = Some(data.completed_at);
            }
        }
    }
}

// Query methods
impl DonationRequest {
    pub fn donation_id(&self) -> DonationItemId {
        self.donation_id
    }

    pub fn requested_by(&self) -> UserId {
        self.requested_by
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn status(&self) -> DonationRequestStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

// Command methods (return events)
impl DonationRequest {
    /// Builds a new PENDING request against a donation owned by `donation_owner`.
    pub fn create(
        cmd: &CreateDonationRequest,
        donation_owner: UserId,
    ) -> Result<(DonationRequest, DonationRequestEvent), DonationRequestError> {
        if cmd.requested_by == donation_owner {
            return Err(DonationRequestError::OwnDonation);
        }

        let event = DonationRequestEvent::created(
            cmd.request_id,
            cmd.donation_id,
            cmd.requested_by,
            cmd.message.clone(),
        );

        let mut request = DonationRequest::default();
        request.apply(event.clone());
        Ok((request, event))
    }

    pub fn accept(&self, owner_id: UserId) -> Result<Vec<DonationRequestEvent>, DonationRequestError> {
        if !self.status.can_accept() {
            return Err(DonationRequestError::InvalidStateTransition {
                current_state: self.status,
                action: "accept",
            });
        }

        Ok(vec![DonationRequestEvent::accepted(owner_id)])
    }

    pub fn reject(&self, owner_id: UserId) -> Result<Vec<DonationRequestEvent>, DonationRequestError> {
        if !self.status.can_reject() {
            return Err(DonationRequestError::InvalidStateTransition {
                current_state: self.status,
                action: "reject",
            });
        }

        Ok(vec![DonationRequestEvent::rejected(owner_id)])
    }

    /// Marks the donation as received.
    ///
    /// With `require_accepted` unset, completion is allowed from any
    /// non-completed state.
    pub fn complete(
        &self,
        requester_id: UserId,
        require_accepted: bool,
    ) -> Result<Vec<DonationRequestEvent>, DonationRequestError> {
        if !self.status.can_complete(require_accepted) {
            return Err(DonationRequestError::InvalidStateTransition {
                current_state: self.status,
                action: "complete",
            });
        }

        Ok(vec![DonationRequestEvent::completed(requester_id)])
    }
}
