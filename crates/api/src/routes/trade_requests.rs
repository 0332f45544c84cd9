//! Trade request endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{ItemId, TradeRequestId, UserId};
use domain::{
    AcceptTradeRequest, CreateTradeRequest, Money, RejectTradeRequest, TradeKind, TradeRequest,
    TradeRequestDetails, TradeStatus,
};
use record_store::{Record, RecordStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

use super::parse_id;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateTradeRequestBody {
    pub item_id: ItemId,
    /// `MONEY` or `ITEM`, case-insensitive. Defaults to `MONEY`.
    pub kind: Option<String>,
    pub money_offer_cents: Option<i64>,
    pub message: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct AcceptTradeRequestBody {
    pub selected_item_id: Option<ItemId>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingQuery {
    pub status: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct TradeRequestResponse {
    pub id: TradeRequestId,
    pub item_id: ItemId,
    pub offered_by: UserId,
    pub kind: TradeKind,
    pub money_offer_cents: i64,
    pub message: Option<String>,
    pub receiver_selected_item_id: Option<ItemId>,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&TradeRequest> for TradeRequestResponse {
    fn from(request: &TradeRequest) -> Self {
        Self {
            id: request.id(),
            item_id: request.item_id(),
            offered_by: request.offered_by(),
            kind: request.kind(),
            money_offer_cents: request.money_offer().cents(),
            message: request.message().map(String::from),
            receiver_selected_item_id: request.receiver_selected_item_id(),
            status: request.status(),
            created_at: request.created_at(),
        }
    }
}

// -- Handlers --

/// POST /api/trade-requests: make an offer against an item.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Json(body): Json<CreateTradeRequestBody>,
) -> Result<(StatusCode, Json<TradeRequestResponse>), ApiError> {
    let kind = body
        .kind
        .as_deref()
        .map(str::parse::<TradeKind>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let mut cmd = CreateTradeRequest::new(body.item_id, caller);
    cmd.kind = kind;
    cmd.money_offer = body.money_offer_cents.map(Money::from_cents);
    cmd.message = body.message;

    let request = state.trades.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(TradeRequestResponse::from(&request))))
}

/// GET /api/trade-requests/incoming: offers against the caller's items.
#[tracing::instrument(skip(state))]
pub async fn incoming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Query(query): Query<IncomingQuery>,
) -> Result<Json<Vec<TradeRequestDetails>>, ApiError> {
    let details = state
        .trades
        .detailed_view(caller, query.status.as_deref())
        .await?;
    Ok(Json(details))
}

/// POST /api/trade-requests/{id}/accept: accept an offer.
///
/// The body is optional; it only carries the selected item for item trades.
#[tracing::instrument(skip(state, body))]
pub async fn accept<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TradeRequestResponse>, ApiError> {
    let request_id: TradeRequestId = parse_id(&id)?;
    let body: AcceptTradeRequestBody = if body.is_empty() {
        AcceptTradeRequestBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?
    };

    let mut cmd = AcceptTradeRequest::new(request_id, caller);
    if let Some(selected) = body.selected_item_id {
        cmd = cmd.selecting(selected);
    }

    let result = state.trades.accept(cmd).await?;
    Ok(Json(TradeRequestResponse::from(&result.aggregate)))
}

/// POST /api/trade-requests/{id}/reject: reject an offer.
#[tracing::instrument(skip(state))]
pub async fn reject<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<TradeRequestResponse>, ApiError> {
    let request_id: TradeRequestId = parse_id(&id)?;
    let result = state
        .trades
        .reject(RejectTradeRequest::new(request_id, caller))
        .await?;
    Ok(Json(TradeRequestResponse::from(&result.aggregate)))
}
