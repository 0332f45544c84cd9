//! Rating endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{DonationRequestId, UserId};
use domain::{RateDonation, Rating};
use record_store::RecordStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

use super::parse_id;

#[derive(Deserialize)]
pub struct RateDonationBody {
    pub donation_request_id: DonationRequestId,
    pub score: u8,
    pub comment: Option<String>,
}

/// POST /api/ratings: rate the donor of a donation the caller requested.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Json(body): Json<RateDonationBody>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    let rating = state
        .ratings
        .rate(RateDonation {
            donation_request_id: body.donation_request_id,
            rater_id: caller,
            score: body.score,
            comment: body.comment,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

/// GET /api/ratings/user/{user_id}: ratings a user has received.
#[tracing::instrument(skip(state))]
pub async fn by_user<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Rating>>, ApiError> {
    let user: UserId = parse_id(&user_id)?;
    Ok(Json(state.ratings.ratings_for_user(user).await?))
}
