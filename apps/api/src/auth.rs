use axum::async_trait;
use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Request;
use tracing::Span;
use uuid::Uuid;

use crate::errors::AppError;

/// Header carrying the verified caller id, set by the authenticating gateway.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// Span opened for every HTTP request. `user_id` starts empty and is filled in by
/// [`OwnerId`] once the caller is known.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        user_id = tracing::field::Empty,
    )
}

/// The authenticated caller.
///
/// Authentication happens upstream; the id in `X-User-ID` is trusted as-is.
/// A missing or malformed header rejects the request with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        Span::current().record("user_id", tracing::field::display(owner_id));

        Ok(OwnerId(owner_id))
    }
}
