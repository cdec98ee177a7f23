use axum::{Json, Router, response::IntoResponse, routing::get};
use util::state::AppState;

use crate::response::ApiResponse;

/// Builds the `/health` route.
///
/// Useful for uptime checks, load balancers, or deployment health monitoring.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": "OK",
///   "message": "Health check passed"
/// }
/// ```
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK", "Health check passed"))
}
