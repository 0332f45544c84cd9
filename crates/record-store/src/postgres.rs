use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    RecordQuery, Result, StoreError, StoredRecord, Version,
    store::RecordStore,
};

const COLUMNS: &str = "kind, id, version, created_at, updated_at, payload";

/// PostgreSQL-backed record store implementation.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_record(row: PgRow) -> Result<StoredRecord> {
        Ok(StoredRecord {
            kind: row.try_get("kind")?,
            id: row.try_get::<Uuid, _>("id")?,
            version: Version::new(row.try_get("version")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            payload: row.try_get("payload")?,
        })
    }

    async fn current_version(&self, kind: &str, id: Uuid) -> Result<Option<Version>> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT version FROM records WHERE kind = $1 AND id = $2")
                .bind(kind)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(version.map(Version::new))
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn insert_row(&self, row: StoredRecord) -> Result<StoredRecord> {
        let inserted = sqlx::query(&format!(
            r#"
            INSERT INTO records (kind, id, version, created_at, updated_at, payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (kind, id) DO NOTHING
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&row.kind)
        .bind(row.id)
        .bind(row.version.as_i64())
        .bind(row.created_at)
        .bind(row.updated_at)
        .bind(&row.payload)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(inserted) => Self::row_to_record(inserted),
            None => Err(StoreError::AlreadyExists {
                kind: row.kind,
                id: row.id,
            }),
        }
    }

    async fn get_row(&self, kind: &str, id: Uuid) -> Result<Option<StoredRecord>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM records WHERE kind = $1 AND id = $2"
        ))
        .bind(kind)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn update_row(
        &self,
        kind: &str,
        id: Uuid,
        payload: serde_json::Value,
        expected: Version,
    ) -> Result<StoredRecord> {
        // The version predicate makes this a single compare-and-swap
        let updated = sqlx::query(&format!(
            r#"
            UPDATE records
            SET payload = $3, version = version + 1, updated_at = $4
            WHERE kind = $1 AND id = $2 AND version = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(kind)
        .bind(id)
        .bind(&payload)
        .bind(Utc::now())
        .bind(expected.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return Self::row_to_record(row);
        }

        match self.current_version(kind, id).await? {
            Some(actual) => Err(StoreError::ConcurrencyConflict {
                kind: kind.to_string(),
                id,
                expected,
                actual,
            }),
            None => Err(StoreError::NotFound {
                kind: kind.to_string(),
                id,
            }),
        }
    }

    async fn delete_row(&self, kind: &str, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM records WHERE kind = $1 AND id = $2")
            .bind(kind)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query_rows(&self, kind: &str, query: &RecordQuery) -> Result<Vec<StoredRecord>> {
        let mut sql = format!("SELECT {COLUMNS} FROM records WHERE kind = $1");
        let mut param_count = 1;

        // Build dynamic query
        for _ in &query.filters {
            sql.push_str(&format!(
                " AND payload ->> ${} = ANY(${})",
                param_count + 1,
                param_count + 2
            ));
            param_count += 2;
        }

        sql.push_str(" ORDER BY created_at ASC, id ASC");

        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }
        if query.offset.is_some() {
            param_count += 1;
            sql.push_str(&format!(" OFFSET ${param_count}"));
        }

        // Build and execute query with parameters
        let mut sqlx_query = sqlx::query(&sql).bind(kind);

        for filter in &query.filters {
            sqlx_query = sqlx_query.bind(&filter.field).bind(&filter.values);
        }
        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            sqlx_query = sqlx_query.bind(offset as i64);
        }

        tracing::trace!(%kind, filters = query.filters.len(), "querying records");

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_record).collect()
    }
}
