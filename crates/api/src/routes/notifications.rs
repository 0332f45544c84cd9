//! Notification mailbox endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::NotificationId;
use domain::Notification;
use record_store::RecordStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

use super::parse_id;

#[derive(Debug, Deserialize)]
pub struct ReadQuery {
    /// Defaults to `true`.
    pub read: Option<bool>,
}

/// GET /api/notifications/me
#[tracing::instrument(skip(state))]
pub async fn mine<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.mailbox.list_for_user(caller).await?))
}

/// PUT /api/notifications/{id}/read?read=
#[tracing::instrument(skip(state))]
pub async fn mark_read<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Json<Notification>, ApiError> {
    let id: NotificationId = parse_id(&id)?;
    let read = query.read.unwrap_or(true);
    Ok(Json(state.mailbox.set_read(caller, id, read).await?))
}

/// DELETE /api/notifications/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: NotificationId = parse_id(&id)?;
    state.mailbox.delete(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
