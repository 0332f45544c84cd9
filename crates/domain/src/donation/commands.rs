//! Donation request commands.

use common::{DonationItemId, DonationRequestId, UserId};

use crate::command::Command;

use super::DonationRequest;

/// Command to ask for a donation.
#[derive(Debug, Clone)]
pub struct CreateDonationRequest {
    pub request_id: DonationRequestId,
    pub donation_id: DonationItemId,
    pub requested_by: UserId,
    pub message: Option<String>,
}

impl CreateDonationRequest {
    /// Creates a command with a generated request id.
    pub fn new(donation_id: DonationItemId, requested_by: UserId) -> Self {
        Self {
            request_id: DonationRequestId::new(),
            donation_id,
            requested_by,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Command for CreateDonationRequest {
    type Aggregate = DonationRequest;

    fn aggregate_id(&self) -> DonationRequestId {
        self.request_id
    }
}

/// Command for the donor to accept a request.
#[derive(Debug, Clone)]
pub struct AcceptDonationRequest {
    pub request_id: DonationRequestId,
    pub owner_id: UserId,
}

impl AcceptDonationRequest {
    pub fn new(request_id: DonationRequestId, owner_id: UserId) -> Self {
        Self {
            request_id,
            owner_id,
        }
    }
}

impl Command for AcceptDonationRequest {
    type Aggregate = DonationRequest;

    fn aggregate_id(&self) -> DonationRequestId {
        self.request_id
    }
}

/// Command for the donor to reject a request.
#[derive(Debug, Clone)]
pub struct RejectDonationRequest {
    pub request_id: DonationRequestId,
    pub owner_id: UserId,
}

impl RejectDonationRequest {
    pub fn new(request_id: DonationRequestId, owner_id: UserId) -> Self {
        Self {
            request_id,
            owner_id,
        }
    }
}

impl Command for RejectDonationRequest {
    type Aggregate = DonationRequest;

    fn aggregate_id(&self) -> DonationRequestId {
        self.request_id
    }
}

/// Command for the requester to confirm the item was received.
#[derive(Debug, Clone)]
pub struct CompleteDonationRequest {
    pub request_id: DonationRequestId,
    pub requester_id: UserId,
}

impl CompleteDonationRequest {
    pub fn new(request_id: DonationRequestId, requester_id: UserId) -> Self {
        Self {
            request_id,
            requester_id,
        }
    }
}

impl Command for CompleteDonationRequest {
    type Aggregate = DonationRequest;

    fn aggregate_id(&self) -> DonationRequestId {
        self.request_id
    }
}
