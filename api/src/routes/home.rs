use axum::{
    Router,
    response::{IntoResponse, Redirect},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use util::state::AppState;

use crate::auth::extractors::MaybeClaims;
use crate::error::AppResult;
use crate::response::Page;

pub fn home_routes() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// GET /
///
/// Landing page for visitors. Signed-in users go straight to their dashboard.
pub async fn home(MaybeClaims(claims): MaybeClaims, jar: CookieJar) -> AppResult {
    if claims.is_some() {
        return Ok(Redirect::to("/dashboard/").into_response());
    }
    Ok(Page::new("home.html", json!({})).render(jar))
}
