//! HTTP route handlers.

pub mod donation_requests;
pub mod health;
pub mod items;
pub mod metrics;
pub mod notifications;
pub mod ratings;
pub mod trade_requests;
pub mod users;

use std::str::FromStr;

use common::ParseIdError;

use crate::error::ApiError;

/// Parses a typed identifier from a path segment.
fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = ParseIdError>,
{
    raw.parse()
        .map_err(|e: ParseIdError| ApiError::BadRequest(e.to_string()))
}
