use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::convert::Infallible;

use crate::auth::session::SESSION_COOKIE;
use crate::auth::{Claims, RequestContext, decode_jwt};
use crate::error::AppError;

/// Returns the raw session token: the session cookie first, then a Bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_owned())
}

/// Decoded claims of the request, if it carries a valid token.
pub fn session_claims(headers: &HeaderMap) -> Option<Claims> {
    session_token(headers).and_then(|token| decode_jwt(&token))
}

/// Claims of the caller on public pages, without touching the database.
#[derive(Debug, Clone)]
pub struct MaybeClaims(pub Option<Claims>);

impl<S> FromRequestParts<S> for MaybeClaims
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeClaims(session_claims(&parts.headers)))
    }
}

/// Pulls the [`RequestContext`] placed by the authentication guard.
///
/// Handlers mounted without the guard get redirected to the login page.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
