//! HTTP API for the exchange request lifecycle engine.
//!
//! Exposes trade and donation request transitions, their read-only views,
//! ratings and the notification mailbox, with structured logging (tracing)
//! and Prometheus metrics. The caller is identified by the `X-User-Id`
//! header forwarded by the identity provider.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
///
/// `storage` names the record store backend reported by `/health`.
pub fn create_app<S: RecordStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    storage: &'static str,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let health_router = Router::new()
        .route("/health", get(routes::health::check))
        .with_state(storage);

    let api = Router::new()
        .route("/users", post(routes::users::register::<S>))
        .route("/items", post(routes::items::create::<S>))
        .route("/items/owner/{user_id}", get(routes::items::by_owner::<S>))
        .route("/donations", post(routes::items::create_donation::<S>))
        .route("/trade-requests", post(routes::trade_requests::create::<S>))
        .route(
            "/trade-requests/incoming",
            get(routes::trade_requests::incoming::<S>),
        )
        .route(
            "/trade-requests/{id}/accept",
            post(routes::trade_requests::accept::<S>),
        )
        .route(
            "/trade-requests/{id}/reject",
            post(routes::trade_requests::reject::<S>),
        )
        .route(
            "/donation-requests",
            post(routes::donation_requests::create::<S>),
        )
        .route(
            "/donation-requests/incoming",
            get(routes::donation_requests::incoming::<S>),
        )
        .route(
            "/donation-requests/sent",
            get(routes::donation_requests::sent::<S>),
        )
        .route(
            "/donation-requests/{id}/accept",
            post(routes::donation_requests::accept::<S>),
        )
        .route(
            "/donation-requests/{id}/reject",
            post(routes::donation_requests::reject::<S>),
        )
        .route(
            "/donation-requests/{id}/complete",
            post(routes::donation_requests::complete::<S>),
        )
        .route(
            "/donation-requests/{id}/complete-details",
            get(routes::donation_requests::complete_details::<S>),
        )
        .route("/ratings", post(routes::ratings::create::<S>))
        .route("/ratings/user/{user_id}", get(routes::ratings::by_user::<S>))
        .route("/notifications/me", get(routes::notifications::mine::<S>))
        .route(
            "/notifications/{id}/read",
            put(routes::notifications::mark_read::<S>),
        )
        .route(
            "/notifications/{id}",
            axum::routing::delete(routes::notifications::delete::<S>),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(health_router)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
