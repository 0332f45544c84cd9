use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    RecordQuery, Result, StoreError, StoredRecord, Version,
    store::RecordStore,
};

type Key = (String, Uuid);

/// In-memory record store implementation.
///
/// Provides the same interface and the same compare-and-swap guarantees as
/// the PostgreSQL implementation; the version check and the write happen
/// under a single write lock.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    rows: Arc<RwLock<HashMap<Key, StoredRecord>>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows stored, across all kinds.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert_row(&self, row: StoredRecord) -> Result<StoredRecord> {
        let mut rows = self.rows.write().await;
        let key = (row.kind.clone(), row.id);

        if rows.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: row.kind,
                id: row.id,
            });
        }

        rows.insert(key, row.clone());
        Ok(row)
    }

    async fn get_row(&self, kind: &str, id: Uuid) -> Result<Option<StoredRecord>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&(kind.to_string(), id)).cloned())
    }

    async fn update_row(
        &self,
        kind: &str,
        id: Uuid,
        payload: serde_json::Value,
        expected: Version,
    ) -> Result<StoredRecord> {
        let mut rows = self.rows.write().await;

        let row = rows
            .get_mut(&(kind.to_string(), id))
            .ok_or_else(|| StoreError::NotFound {
                kind: kind.to_string(),
                id,
            })?;

        if row.version != expected {
            return Err(StoreError::ConcurrencyConflict {
                kind: kind.to_string(),
                id,
                expected,
                actual: row.version,
            });
        }

        row.payload = payload;
        row.version = row.version.next();
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn delete_row(&self, kind: &str, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        Ok(rows.remove(&(kind.to_string(), id)).is_some())
    }

    async fn query_rows(&self, kind: &str, query: &RecordQuery) -> Result<Vec<StoredRecord>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<_> = rows
            .values()
            .filter(|row| row.kind == kind && query.matches(row))
            .cloned()
            .collect();

        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        // Apply offset and limit
        let offset = query.offset.unwrap_or(0);
        let matched = matched.into_iter().skip(offset);

        let matched: Vec<StoredRecord> = if let Some(limit) = query.limit {
            matched.take(limit).collect()
        } else {
            matched.collect()
        };

        Ok(matched)
    }
}
