//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::UserId;

use crate::error::ApiError;

/// Header carrying the caller identity set by the upstream identity provider.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller of a request.
///
/// The identity provider in front of the API has already validated the
/// caller's token; this only reads the identifier it forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = read_caller(parts);
        if caller.is_err() {
            metrics::counter!("api_unauthenticated_requests_total").increment(1);
        }
        caller
    }
}

fn read_caller(parts: &Parts) -> Result<Caller, ApiError> {
    let value = parts
        .headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::Unauthenticated("missing X-User-Id header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthenticated("invalid X-User-Id header".to_string()))?;

    value
        .parse()
        .map(Caller)
        .map_err(|e: common::ParseIdError| ApiError::Unauthenticated(e.to_string()))
}
