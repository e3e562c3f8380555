use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

pub const USER_ID_COOKIE: &str = "ambience_user_id";
const ONE_YEAR_SECONDS: u64 = 60 * 60 * 24 * 365;

/// Anonymous user identity for the current request. Always present in
/// request extensions: either the presented cookie value or a token
/// minted by the middleware for this response.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

/// Value of a cookie from a raw `Cookie` header.
pub fn cookie_value(headers: &axum::http::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let cookie = cookie.trim();
                cookie
                    .strip_prefix(name)
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(|s| s.to_string())
            })
        })
}

/// Runs on every route so the identity cookie exists from the first
/// visit: opaque uuid token, 1-year expiry, set transparently when
/// absent.
pub async fn issue_identity(mut req: Request, next: Next) -> Response {
    if let Some(id) = cookie_value(req.headers(), USER_ID_COOKIE) {
        req.extensions_mut().insert(Identity(id));
        return next.run(req).await;
    }

    let id = Uuid::new_v4().to_string();
    debug!(user_id = %id, "issuing identity cookie");
    req.extensions_mut().insert(Identity(id.clone()));

    let mut response = next.run(req).await;
    let cookie =
        format!("{USER_ID_COOKIE}={id}; Path=/; Max-Age={ONE_YEAR_SECONDS}; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
