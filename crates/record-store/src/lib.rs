//! Flat keyed record storage for the exchange request engine.
//!
//! Every entity is stored as one JSON document per `(kind, id)` key together
//! with a monotonically increasing version. Updates are compare-and-swap on
//! that version, which is what lets callers turn a read-check-write sequence
//! into a single atomic transition.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use query::RecordQuery;
pub use record::{Record, StoredRecord, Version, Versioned};
pub use store::{RecordStore, RecordStoreExt};
