//! Core aggregate and domain event traits.

use record_store::Record;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events.
///
/// Domain events represent lifecycle transitions that have happened.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone + std::fmt::Debug {
    /// Returns the event type name.
    ///
    /// Used for logging and metrics labels.
    fn event_type(&self) -> &'static str;
}

/// Trait for request aggregates.
///
/// An aggregate is persisted as a single versioned record. Command methods
/// inspect the current state and return the events a transition produces;
/// `apply` folds those events into the state.
pub trait Aggregate: Record {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The type of errors this aggregate's commands can produce.
    type Error: std::error::Error + Send + Sync;

    /// Human-readable name used in error messages, e.g. `"Trade request"`.
    const LABEL: &'static str;

    /// Applies an event to the aggregate, updating its state.
    ///
    /// Must be pure and deterministic, and must not fail: events represent
    /// facts that already passed validation.
    fn apply(&mut self, event: Self::Event);

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}
