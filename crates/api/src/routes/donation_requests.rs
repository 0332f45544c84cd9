//! Donation request endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{DonationItemId, DonationRequestId, UserId};
use domain::{
    AcceptDonationRequest, CompleteDonationRequest, CompletionDetails, CreateDonationRequest,
    DonationRequest, DonationRequestStatus, DonationRequestView, RejectDonationRequest,
};
use record_store::{Record, RecordStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

use super::parse_id;

#[derive(Deserialize)]
pub struct CreateDonationRequestBody {
    pub donation_id: DonationItemId,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct DonationRequestResponse {
    pub id: DonationRequestId,
    pub donation_id: DonationItemId,
    pub requested_by: UserId,
    pub message: Option<String>,
    pub status: DonationRequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&DonationRequest> for DonationRequestResponse {
    fn from(request: &DonationRequest) -> Self {
        Self {
            id: request.id(),
            donation_id: request.donation_id(),
            requested_by: request.requested_by(),
            message: request.message().map(String::from),
            status: request.status(),
            created_at: request.created_at(),
            decided_at: request.decided_at(),
            completed_at: request.completed_at(),
        }
    }
}

/// POST /api/donation-requests: ask for a donation.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Json(body): Json<CreateDonationRequestBody>,
) -> Result<(StatusCode, Json<DonationRequestResponse>), ApiError> {
    let mut cmd = CreateDonationRequest::new(body.donation_id, caller);
    cmd.message = body.message;

    let request = state.donations.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(DonationRequestResponse::from(&request))))
}

/// GET /api/donation-requests/incoming: requests for the caller's donations.
#[tracing::instrument(skip(state))]
pub async fn incoming<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<DonationRequestView>>, ApiError> {
    Ok(Json(state.donations.incoming_view(caller).await?))
}

/// GET /api/donation-requests/sent: requests the caller has made.
#[tracing::instrument(skip(state))]
pub async fn sent<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
) -> Result<Json<Vec<DonationRequestView>>, ApiError> {
    Ok(Json(state.donations.sent_view(caller).await?))
}

/// POST /api/donation-requests/{id}/accept
#[tracing::instrument(skip(state))]
pub async fn accept<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DonationRequestResponse>, ApiError> {
    let request_id: DonationRequestId = parse_id(&id)?;
    let result = state
        .donations
        .accept(AcceptDonationRequest::new(request_id, caller))
        .await?;
    Ok(Json(DonationRequestResponse::from(&result.aggregate)))
}

/// POST /api/donation-requests/{id}/reject
#[tracing::instrument(skip(state))]
pub async fn reject<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DonationRequestResponse>, ApiError> {
    let request_id: DonationRequestId = parse_id(&id)?;
    let result = state
        .donations
        .reject(RejectDonationRequest::new(request_id, caller))
        .await?;
    Ok(Json(DonationRequestResponse::from(&result.aggregate)))
}

/// POST /api/donation-requests/{id}/complete: confirm the donation arrived.
#[tracing::instrument(skip(state))]
pub async fn complete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DonationRequestResponse>, ApiError> {
    let request_id: DonationRequestId = parse_id(&id)?;
    let result = state
        .donations
        .complete(CompleteDonationRequest::new(request_id, caller))
        .await?;
    Ok(Json(DonationRequestResponse::from(&result.aggregate)))
}

/// GET /api/donation-requests/{id}/complete-details
#[tracing::instrument(skip(state))]
pub async fn complete_details<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(_caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<CompletionDetails>, ApiError> {
    let request_id: DonationRequestId = parse_id(&id)?;
    Ok(Json(state.donations.completion_details(request_id).await?))
}
