//! User directory pass-through.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{DomainError, UserDirectory, UserProfile};
use record_store::RecordStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub profile_image: Option<String>,
}

/// POST /api/users: register the caller's profile.
#[tracing::instrument(skip(state, req))]
pub async fn register<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    if req.full_name.trim().is_empty() {
        return Err(ApiError::BadRequest("full_name must not be empty".to_string()));
    }

    let mut profile = UserProfile::new(caller, req.full_name)
        .with_email(req.email)
        .with_phone(req.phone)
        .with_address(req.address);
    profile.profile_image = req.profile_image;

    let profile = state
        .users
        .register(profile)
        .await
        .map_err(DomainError::from)?;

    Ok((StatusCode::CREATED, Json(profile)))
}
