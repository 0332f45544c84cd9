use async_trait::async_trait;
use uuid::Uuid;

use crate::{Record, RecordQuery, Result, StoredRecord, Version, Versioned};

/// Core trait for record store implementations.
///
/// A record store keeps one JSON document per `(kind, id)` key. All
/// implementations must be thread-safe (Send + Sync) and must perform the
/// version check of [`RecordStore::update_row`] atomically with the write.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new row.
    ///
    /// Fails with `AlreadyExists` if the key is taken.
    async fn insert_row(&self, row: StoredRecord) -> Result<StoredRecord>;

    /// Fetches a row by key.
    async fn get_row(&self, kind: &str, id: Uuid) -> Result<Option<StoredRecord>>;

    /// Replaces the payload of a row if its version equals `expected`.
    ///
    /// On success the row moves to `expected.next()`. Fails with
    /// `ConcurrencyConflict` on a version mismatch and `NotFound` if the
    /// key does not exist.
    async fn update_row(
        &self,
        kind: &str,
        id: Uuid,
        payload: serde_json::Value,
        expected: Version,
    ) -> Result<StoredRecord>;

    /// Deletes a row. Returns true if it existed.
    async fn delete_row(&self, kind: &str, id: Uuid) -> Result<bool>;

    /// Returns rows of a kind matching the query.
    ///
    /// Rows are ordered by insertion time, then id.
    async fn query_rows(&self, kind: &str, query: &RecordQuery) -> Result<Vec<StoredRecord>>;
}

/// Typed convenience methods over a [`RecordStore`].
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Inserts a new record at the first version.
    async fn insert<R: Record>(&self, record: R) -> Result<Versioned<R>> {
        let row = StoredRecord::from_record(&record)?;
        self.insert_row(row).await?.into_versioned()
    }

    /// Loads a record by id.
    async fn get<R: Record>(&self, id: R::Id) -> Result<Option<Versioned<R>>> {
        match self.get_row(R::KIND, id.into()).await? {
            Some(row) => Ok(Some(row.into_versioned()?)),
            None => Ok(None),
        }
    }

    /// Writes a record if the stored version still equals `expected`.
    async fn update<R: Record>(&self, record: R, expected: Version) -> Result<Versioned<R>> {
        let payload = serde_json::to_value(&record)?;
        self.update_row(R::KIND, record.id().into(), payload, expected)
            .await?
            .into_versioned()
    }

    /// Deletes a record by id. Returns true if it existed.
    async fn delete<R: Record>(&self, id: R::Id) -> Result<bool> {
        self.delete_row(R::KIND, id.into()).await
    }

    /// Returns all records of a kind matching the query.
    async fn query<R: Record>(&self, query: RecordQuery) -> Result<Vec<Versioned<R>>> {
        self.query_rows(R::KIND, &query)
            .await?
            .into_iter()
            .map(StoredRecord::into_versioned)
            .collect()
    }

    /// Returns every record of a kind.
    async fn list<R: Record>(&self) -> Result<Vec<Versioned<R>>> {
        self.query(RecordQuery::new()).await
    }

    /// Returns records whose payload field equals the value.
    async fn find_by<R: Record>(
        &self,
        field: &'static str,
        value: String,
    ) -> Result<Vec<Versioned<R>>> {
        self.query(RecordQuery::new().field_eq(field, value)).await
    }

    /// Checks whether a record exists.
    async fn exists<R: Record>(&self, id: R::Id) -> Result<bool> {
        Ok(self.get_row(R::KIND, id.into()).await?.is_some())
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}
