//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::UserId;
use domain::LifecyclePolicy;
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::InMemoryRecordStore;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            api::routes::metrics::install_recorder().expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> Router {
    let state = Arc::new(api::AppState::new(
        InMemoryRecordStore::new(),
        LifecyclePolicy::default(),
    ));
    api::create_app(state, get_metrics_handle(), "memory")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<UserId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("x-user-id", caller.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, name: &str) -> UserId {
    let user = UserId::new();
    let (status, _) = send(
        app,
        "POST",
        "/api/users",
        Some(user),
        Some(json!({ "full_name": name, "email": format!("{}@example.com", name.to_lowercase()) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    user
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, json) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
}

#[tokio::test]
async fn test_missing_or_invalid_caller_is_401() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/api/notifications/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].as_str().unwrap().contains("X-User-Id"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications/me")
                .header("x-user-id", "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_path_id_is_400() {
    let app = setup();
    let caller = UserId::new();
    let (status, _) = send(
        &app,
        "POST",
        "/api/donation-requests/nope/accept",
        Some(caller),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_donation_lifecycle_over_http() {
    let app = setup();
    let alice = register(&app, "Alice").await;
    let bob = register(&app, "Bob").await;

    let (status, donation) = send(
        &app,
        "POST",
        "/api/donations",
        Some(alice),
        Some(json!({ "title": "Desk lamp", "description": "Works fine" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(donation["status"], "ACTIVE");
    let donation_id = donation["id"].as_str().unwrap().to_string();

    // Owners cannot request their own donation
    let (status, json) = send(
        &app,
        "POST",
        "/api/donation-requests",
        Some(alice),
        Some(json!({ "donation_id": donation_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, request) = send(
        &app,
        "POST",
        "/api/donation-requests",
        Some(bob),
        Some(json!({ "donation_id": donation_id, "message": "For my desk" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "PENDING");
    let request_id = request["id"].as_str().unwrap().to_string();

    // A third party cannot accept
    let carol = UserId::new();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/donation-requests/{request_id}/accept"),
        Some(carol),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = send(
        &app,
        "POST",
        &format!("/api/donation-requests/{request_id}/accept"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");

    // Already accepted
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/donation-requests/{request_id}/reject"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, incoming) = send(&app, "GET", "/api/donation-requests/incoming", Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(incoming.as_array().unwrap().len(), 1);
    assert_eq!(incoming[0]["counterpart"]["full_name"], "Bob");
    assert_eq!(incoming[0]["donation"]["status"], "RESERVED");

    let (status, sent) = send(&app, "GET", "/api/donation-requests/sent", Some(bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent[0]["counterpart"]["full_name"], "Alice");

    let (status, details) = send(
        &app,
        "GET",
        &format!("/api/donation-requests/{request_id}/complete-details"),
        Some(bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["donor"]["email"], "alice@example.com");

    let (status, completed) = send(
        &app,
        "POST",
        &format!("/api/donation-requests/{request_id}/complete"),
        Some(bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "COMPLETED");

    let (status, rating) = send(
        &app,
        "POST",
        "/api/ratings",
        Some(bob),
        Some(json!({ "donation_request_id": request_id, "score": 5, "comment": "Thanks!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rating["ratee_id"], alice.to_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/ratings",
        Some(bob),
        Some(json!({ "donation_request_id": request_id, "score": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, ratings) = send(
        &app,
        "GET",
        &format!("/api/ratings/user/{alice}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ratings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_trade_lifecycle_and_mailbox() {
    let app = setup();
    let quinn = register(&app, "Quinn").await;
    let pat = register(&app, "Pat").await;

    let (status, guitar) = send(
        &app,
        "POST",
        "/api/items",
        Some(quinn),
        Some(json!({ "title": "Guitar", "price_cents": 30000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let guitar_id = guitar["id"].as_str().unwrap().to_string();

    let (_, amp) = send(
        &app,
        "POST",
        "/api/items",
        Some(pat),
        Some(json!({ "title": "Amplifier", "price_cents": 25000, "images": ["amp.jpg"] })),
    )
    .await;
    let amp_id = amp["id"].as_str().unwrap().to_string();

    let (status, inventory) = send(&app, "GET", &format!("/api/items/owner/{pat}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inventory[0]["title"], "Amplifier");

    let (status, _) = send(
        &app,
        "POST",
        "/api/trade-requests",
        Some(pat),
        Some(json!({ "item_id": guitar_id, "kind": "barter" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, trade) = send(
        &app,
        "POST",
        "/api/trade-requests",
        Some(pat),
        Some(json!({ "item_id": guitar_id, "kind": "item", "message": "Swap?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trade["kind"], "ITEM");
    assert_eq!(trade["money_offer_cents"], 0);
    let trade_id = trade["id"].as_str().unwrap().to_string();

    // Only the item owner may decide
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/trade-requests/{trade_id}/accept"),
        Some(pat),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = send(
        &app,
        "POST",
        &format!("/api/trade-requests/{trade_id}/accept"),
        Some(quinn),
        Some(json!({ "selected_item_id": amp_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");
    assert_eq!(accepted["receiver_selected_item_id"], amp_id);

    let (status, details) = send(
        &app,
        "GET",
        "/api/trade-requests/incoming?status=accepted",
        Some(quinn),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details.as_array().unwrap().len(), 1);
    assert_eq!(details[0]["offered_item"]["title"], "Amplifier");

    let (status, none) = send(
        &app,
        "GET",
        "/api/trade-requests/incoming?status=rejected",
        Some(quinn),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(none.as_array().unwrap().is_empty());

    // The offerer's mailbox holds the acceptance
    let (status, inbox) = send(&app, "GET", "/api/notifications/me", Some(pat), None).await;
    assert_eq!(status, StatusCode::OK);
    let inbox = inbox.as_array().unwrap().clone();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["message"], "Pat, your trade request has been accepted!");
    assert_eq!(inbox[0]["read"], false);
    let notification_id = inbox[0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/notifications/{notification_id}/read"),
        Some(quinn),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, marked) = send(
        &app,
        "PUT",
        &format!("/api/notifications/{notification_id}/read?read=true"),
        Some(pat),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["read"], true);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/notifications/{notification_id}"),
        Some(pat),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/notifications/{notification_id}"),
        Some(pat),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_request_is_404() {
    let app = setup();
    let caller = UserId::new();
    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/trade-requests/{}/reject", UserId::new()),
        Some(caller),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}
