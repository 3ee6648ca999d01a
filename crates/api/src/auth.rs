//! Caller identity extraction.
//!
//! Authentication itself happens upstream; the proxy forwards the
//! verified identity in the `x-user-id` header. Requests without it are
//! rejected before any handler logic runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// Header carrying the verified caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the caller identity.
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
