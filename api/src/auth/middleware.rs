use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use headers::{HeaderMapExt, UserAgent};
use std::net::SocketAddr;
use tracing::info;

use crate::auth::extractors::session_claims;

/// Logs method, path, IP address, user ID (if authenticated) and user-agent
/// for each incoming HTTP request. Skips CORS preflight `OPTIONS` requests.
///
/// ```ignore
/// use axum::Router;
/// use axum::middleware::from_fn;
/// use api::auth::middleware::log_request;
///
/// let app = Router::new().layer(from_fn(log_request));
/// ```
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());

    let user_id = session_claims(req.headers()).map(|c| c.sub);

    let user_agent = req
        .headers()
        .typed_get::<UserAgent>()
        .map(|ua| ua.to_string());

    info!(
        method = ?req.method(),
        path = %req.uri().path(),
        ip = %ip,
        user = user_id.unwrap_or(0),
        user_agent = user_agent.unwrap_or_else(|| "unknown".into()),
        "Incoming request"
    );

    next.run(req).await
}
