use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use db::models::user;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::extractors::session_claims;
use crate::error::{AppError, Denied};
use crate::response::flash;

/// Basic guard to ensure the request is authenticated.
///
/// Reloads the user behind the token so deleted accounts and role changes take
/// effect on the next request. Inserts a [`RequestContext`] into the extensions.
/// Policy denials are redirected with the request's pending flash messages kept.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(claims) = session_claims(req.headers()) else {
        return AppError::Unauthenticated.into_response();
    };

    match user::Model::find_by_id(app_state.db(), claims.sub).await {
        Ok(Some(user)) => {
            let jar = CookieJar::from_headers(req.headers());
            req.extensions_mut().insert(RequestContext::from(&user));

            let response = next.run(req).await;
            match response.extensions().get::<Denied>().cloned() {
                Some(Denied(message)) => flash::redirect_with(jar, message, "/dashboard/"),
                None => response,
            }
        }
        Ok(None) => {
            tracing::warn!(user_id = claims.sub, "Session refers to a missing user");
            AppError::Unauthenticated.into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}
