use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::identity::{USER_ID_COOKIE, cookie_value};

/// User token taken from the presented identity cookie. Rejects with an
/// authentication error when the client sent no cookie, regardless of
/// the token the middleware is about to issue on this response.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        cookie_value(&parts.headers, USER_ID_COOKIE)
            .map(UserId)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}

/// Infallible variant for routes where the cookie is optional.
#[derive(Debug, Clone)]
pub struct MaybeUserId(pub Option<String>);

impl<S> FromRequestParts<S> for MaybeUserId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUserId(cookie_value(&parts.headers, USER_ID_COOKIE)))
    }
}
