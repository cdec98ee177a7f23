//! `POST /request_reval/`: revaluation requests from students.
//!
//! Requests are only logged for now; nothing is stored.

use axum::{Form, Router, routing::post};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::{self, Action};
use crate::error::AppResult;
use crate::response::{FlashMessage, flash};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RevaluationForm {
    pub exam_title: String,
    #[serde(rename = "type")]
    pub request_type: String,
    pub reason: String,
}

pub fn requests_routes() -> Router<AppState> {
    Router::new().route("/request_reval/", post(request_reval))
}

/// POST /request_reval/
///
/// Both outcomes redirect to the dashboard: students get
/// `Your request was submitted successfully.`, everyone else `Invalid request`.
pub async fn request_reval(
    jar: CookieJar,
    ctx: RequestContext,
    Form(form): Form<RevaluationForm>,
) -> AppResult {
    if !policy::allows(ctx.role, Action::RequestRevaluation) {
        return Ok(flash::redirect_with(
            jar,
            FlashMessage::error(policy::denial_message(Action::RequestRevaluation)),
            "/dashboard/",
        ));
    }

    tracing::info!(
        user_id = ctx.user_id,
        exam_title = %form.exam_title,
        request_type = %form.request_type,
        reason = %form.reason,
        "Revaluation requested"
    );

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("Your request was submitted successfully."),
        "/dashboard/",
    ))
}
