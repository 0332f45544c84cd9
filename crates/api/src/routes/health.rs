//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Record store backend serving this process (`memory` or `postgres`).
    pub storage: &'static str,
}

/// GET /health
pub async fn check(State(storage): State<&'static str>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage,
    })
}
