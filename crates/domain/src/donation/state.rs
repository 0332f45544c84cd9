//! Donation request state machine.

use serde::{Deserialize, Serialize};

/// The status of a donation request.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Accepted ──► Completed
///           └──► Rejected
/// ```
/// Completion is also reachable from Pending and Rejected unless the
/// lifecycle policy requires acceptance first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationRequestStatus {
    /// Waiting for the donor to decide.
    #[default]
    Pending,

    /// The donor accepted; the donation item is reserved.
    Accepted,

    /// The donor declined (terminal unless completed directly).
    Rejected,

    /// The requester received the item (terminal state).
    Completed,
}

impl DonationRequestStatus {
    /// Returns true if the donor can accept in this state.
    pub fn can_accept(&self) -> bool {
        matches!(self, DonationRequestStatus::Pending)
    }

    /// Returns true if the donor can reject in this state.
    pub fn can_reject(&self) -> bool {
        matches!(self, DonationRequestStatus::Pending)
    }

    /// Returns true if the requester can mark the request completed.
    pub fn can_complete(&self, require_accepted: bool) -> bool {
        if require_accepted {
            matches!(self, DonationRequestStatus::Accepted)
        } else {
            !matches!(self, DonationRequestStatus::Completed)
        }
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationRequestStatus::Completed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationRequestStatus::Pending => "PENDING",
            DonationRequestStatus::Accepted => "ACCEPTED",
            DonationRequestStatus::Rejected => "REJECTED",
            DonationRequestStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for DonationRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_can_be_decided() {
        use DonationRequestStatus::*;

        assert!(Pending.can_accept() && Pending.can_reject());
        for status in [Accepted, Rejected, Completed] {
            assert!(!status.can_accept());
            assert!(!status.can_reject());
        }
    }

    #[test]
    fn test_completion_without_acceptance_requirement() {
        use DonationRequestStatus::*;

        assert!(Pending.can_complete(false));
        assert!(Accepted.can_complete(false));
        assert!(Rejected.can_complete(false));
        assert!(!Completed.can_complete(false));
    }

    #[test]
    fn test_completion_requiring_acceptance() {
        use DonationRequestStatus::*;

        assert!(!Pending.can_complete(true));
        assert!(Accepted.can_complete(true));
        assert!(!Rejected.can_complete(true));
        assert!(!Completed.can_complete(true));
    }

    #[test]
    fn test_display_and_serialization() {
        assert_eq!(DonationRequestStatus::Completed.to_string(), "COMPLETED");
        let json = serde_json::to_string(&DonationRequestStatus::Accepted).unwrap();
        assert_eq!(json, "\"ACCEPTED\"");
    }
}
