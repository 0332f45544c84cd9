//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p record-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use record_store::{
    PostgresRecordStore, Record, RecordQuery, RecordStoreExt, StoreError, Version,
};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_records_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresRecordStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE records")
        .execute(&pool)
        .await
        .unwrap();

    PostgresRecordStore::new(pool)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Offer {
    id: Uuid,
    item_id: Uuid,
    status: String,
    amount_cents: i64,
    selected: Option<Uuid>,
}

impl Record for Offer {
    type Id = Uuid;
    const KIND: &'static str = "Offer";

    fn id(&self) -> Uuid {
        self.id
    }
}

fn offer(item_id: Uuid, status: &str) -> Offer {
    Offer {
        id: Uuid::new_v4(),
        item_id,
        status: status.to_string(),
        amount_cents: 1500,
        selected: None,
    }
}

#[tokio::test]
#[serial]
async fn insert_and_get_record() {
    let store = get_test_store().await;
    let record = offer(Uuid::new_v4(), "PENDING");

    let stored = store.insert(record.clone()).await.unwrap();
    assert_eq!(stored.version, Version::first());

    let loaded = store.get::<Offer>(record.id).await.unwrap().unwrap();
    assert_eq!(loaded.record, record);
}

#[tokio::test]
#[serial]
async fn duplicate_insert_is_rejected() {
    let store = get_test_store().await;
    let record = offer(Uuid::new_v4(), "PENDING");

    store.insert(record.clone()).await.unwrap();
    let result = store.insert(record).await;
    assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
}

#[tokio::test]
#[serial]
async fn compare_and_swap_update() {
    let store = get_test_store().await;
    let mut record = offer(Uuid::new_v4(), "PENDING");
    store.insert(record.clone()).await.unwrap();

    record.status = "ACCEPTED".to_string();
    record.selected = Some(Uuid::new_v4());
    let updated = store
        .update(record.clone(), Version::first())
        .await
        .unwrap();
    assert_eq!(updated.version, Version::new(2));

    record.status = "REJECTED".to_string();
    let stale = store.update(record.clone(), Version::first()).await;
    match stale {
        Err(StoreError::ConcurrencyConflict {
            expected, actual, ..
        }) => {
            assert_eq!(expected, Version::first());
            assert_eq!(actual, Version::new(2));
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let loaded = store.get::<Offer>(record.id).await.unwrap().unwrap();
    assert_eq!(loaded.record.status, "ACCEPTED");
}

#[tokio::test]
#[serial]
async fn update_missing_record_is_not_found() {
    let store = get_test_store().await;
    let result = store
        .update(offer(Uuid::new_v4(), "PENDING"), Version::first())
        .await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
#[serial]
async fn concurrent_updates_have_single_winner() {
    let store = get_test_store().await;
    let record = offer(Uuid::new_v4(), "PENDING");
    store.insert(record.clone()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let store = store.clone();
        let mut candidate = record.clone();
        candidate.status = "ACCEPTED".to_string();
        candidate.selected = Some(Uuid::new_v4());
        handles.push(tokio::spawn(async move {
            store.update(candidate, Version::first()).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
#[serial]
async fn query_by_payload_fields() {
    let store = get_test_store().await;
    let item_a = Uuid::new_v4();
    let item_b = Uuid::new_v4();

    store.insert(offer(item_a, "PENDING")).await.unwrap();
    store.insert(offer(item_a, "ACCEPTED")).await.unwrap();
    store.insert(offer(item_b, "PENDING")).await.unwrap();
    store.insert(offer(Uuid::new_v4(), "PENDING")).await.unwrap();

    let for_a = store
        .find_by::<Offer>("item_id", item_a.to_string())
        .await
        .unwrap();
    assert_eq!(for_a.len(), 2);

    let pending_for_mine = store
        .query::<Offer>(
            RecordQuery::new()
                .field_in("item_id", [item_a, item_b])
                .field_eq("status", "PENDING"),
        )
        .await
        .unwrap();
    assert_eq!(pending_for_mine.len(), 2);

    let by_amount = store
        .query::<Offer>(RecordQuery::new().field_eq("amount_cents", 1500))
        .await
        .unwrap();
    assert_eq!(by_amount.len(), 4);

    let page = store
        .query::<Offer>(RecordQuery::new().limit(2).offset(1))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
}

#[tokio::test]
#[serial]
async fn delete_record() {
    let store = get_test_store().await;
    let record = offer(Uuid::new_v4(), "PENDING");
    store.insert(record.clone()).await.unwrap();

    assert!(store.delete::<Offer>(record.id).await.unwrap());
    assert!(!store.delete::<Offer>(record.id).await.unwrap());
    assert!(store.get::<Offer>(record.id).await.unwrap().is_none());
}
