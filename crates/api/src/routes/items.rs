//! Listing pass-through and the owner inventory projection.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserId;
use domain::{DomainError, DonationItem, Item, ItemCatalog, ItemSnapshot, Money};
use record_store::RecordStore;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::Caller;
use crate::state::AppState;

use super::parse_id;

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateDonationItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// POST /api/items: list a trade item owned by the caller.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    if req.price_cents < 0 {
        return Err(ApiError::BadRequest("price_cents must not be negative".to_string()));
    }

    let mut item = Item::new(caller, req.title, Money::from_cents(req.price_cents))
        .with_description(req.description)
        .with_images(req.images);
    if let Some(category) = req.category_id {
        item = item.with_category(category);
    }

    let item = state
        .catalog
        .add_item(item)
        .await
        .map_err(DomainError::from)?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/items/owner/{user_id}: everything a user has listed.
#[tracing::instrument(skip(state))]
pub async fn by_owner<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ItemSnapshot>>, ApiError> {
    let owner: UserId = parse_id(&user_id)?;
    Ok(Json(state.trades.items_by_owner(owner).await?))
}

/// POST /api/donations: list a donation owned by the caller.
#[tracing::instrument(skip(state, req))]
pub async fn create_donation<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Caller(caller): Caller,
    Json(req): Json<CreateDonationItemRequest>,
) -> Result<(StatusCode, Json<DonationItem>), ApiError> {
    let donation = DonationItem::new(caller, req.title)
        .with_description(req.description)
        .with_images(req.images);

    let donation = state
        .catalog
        .add_donation_item(donation)
        .await
        .map_err(DomainError::from)?;

    Ok((StatusCode::CREATED, Json(donation)))
}
