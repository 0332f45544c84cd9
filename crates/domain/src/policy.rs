//! Switches for lifecycle rules whose strictness is a product decision.

use serde::{Deserialize, Serialize};

/// Lifecycle rules that can be tightened or relaxed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    /// Trade accept/reject check the approver against the item's owner.
    pub verify_trade_owner: bool,

    /// Donation completion requires the request to be ACCEPTED first.
    pub require_accepted_before_complete: bool,

    /// Ratings may only be left on COMPLETED donation requests.
    pub require_completed_before_rating: bool,

    /// At most one rating per donation request.
    pub unique_rating_per_request: bool,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            verify_trade_owner: true,
            require_accepted_before_complete: false,
            require_completed_before_rating: false,
            unique_rating_per_request: true,
        }
    }
}

impl LifecyclePolicy {
    /// The strictest combination of every rule.
    pub fn strict() -> Self {
        Self {
            verify_trade_owner: true,
            require_accepted_before_complete: true,
            require_completed_before_rating: true,
            unique_rating_per_request: true,
        }
    }
}
