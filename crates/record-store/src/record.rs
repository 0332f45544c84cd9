use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::Result;

/// Version number of a stored record, used for optimistic concurrency control.
///
/// A record is written at version 1 and every successful update moves it to
/// the next version. Version 0 never appears on a stored record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version (1) of a freshly inserted record.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// An entity that can be kept in a [`RecordStore`](crate::RecordStore).
///
/// Records of the same `KIND` share a key space; the id must be a UUID
/// newtype so that every backend can key on it directly.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Identifier type of the record.
    type Id: Copy + Into<Uuid> + From<Uuid> + std::fmt::Display + Send + Sync + 'static;

    /// Name of the key space, e.g. `"TradeRequest"`.
    const KIND: &'static str;

    /// Returns the record's identifier.
    fn id(&self) -> Self::Id;
}

/// A typed record together with its storage metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<R> {
    /// The record itself.
    pub record: R,

    /// Version of the record as stored.
    pub version: Version,

    /// When the record was first inserted.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl<R> Versioned<R> {
    /// Consumes the wrapper and returns the record.
    pub fn into_inner(self) -> R {
        self.record
    }
}

/// The untyped, persisted form of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Key space of the record.
    pub kind: String,

    /// Identifier of the record within its key space.
    pub id: Uuid,

    /// Current version.
    pub version: Version,

    /// When the record was first inserted.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,

    /// The record body as JSON.
    pub payload: serde_json::Value,
}

impl StoredRecord {
    /// Builds a version-1 row for a record that is about to be inserted.
    pub fn from_record<R: Record>(record: &R) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            kind: R::KIND.to_string(),
            id: record.id().into(),
            version: Version::first(),
            created_at: now,
            updated_at: now,
            payload: serde_json::to_value(record)?,
        })
    }

    /// Decodes the payload into a typed record.
    pub fn into_versioned<R: Record>(self) -> Result<Versioned<R>> {
        Ok(Versioned {
            record: serde_json::from_value(self.payload)?,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Returns the textual value of a top-level payload field.
    ///
    /// JSON strings yield their contents, other scalars their JSON text,
    /// and `null` or a missing field yields `None`.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match self.payload.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
