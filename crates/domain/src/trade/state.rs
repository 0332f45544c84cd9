//! Trade request state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The status of a trade request.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Accepted
///           └──► Rejected
/// ```
/// Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Waiting for the item owner to decide.
    #[default]
    Pending,

    /// The item owner accepted the offer (terminal state).
    Accepted,

    /// The item owner declined the offer (terminal state).
    Rejected,
}

impl TradeStatus {
    /// Returns true if the request can be accepted in this state.
    pub fn can_accept(&self) -> bool {
        matches!(self, TradeStatus::Pending)
    }

    /// Returns true if the request can be rejected in this state.
    pub fn can_reject(&self) -> bool {
        matches!(self, TradeStatus::Pending)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Accepted | TradeStatus::Rejected)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Pending => "PENDING",
            TradeStatus::Accepted => "ACCEPTED",
            TradeStatus::Rejected => "REJECTED",
        }
    }

    /// Case-insensitive comparison against a status name.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            TradeStatus::Pending,
            TradeStatus::Accepted,
            TradeStatus::Rejected,
        ]
        .into_iter()
        .find(|status| status.matches(s))
        .ok_or_else(|| format!("unknown trade status: {s}"))
    }
}

/// What the offerer puts on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeKind {
    /// A money offer.
    #[default]
    Money,

    /// One of the offerer's own items, chosen by the owner on acceptance.
    Item,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Money => "MONEY",
            TradeKind::Item => "ITEM",
        }
    }
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MONEY" => Ok(TradeKind::Money),
            "ITEM" => Ok(TradeKind::Item),
            _ => Err(format!("unknown trade kind: {s}")),
        }
    }
}
