use axum::{Form, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::notification;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::{Action, allowed_target_roles};
use crate::error::AppResult;
use crate::response::{FlashMessage, Page, flash};
use crate::routes::notifications::common::{NotificationForm, notification_form_context};

/// POST /notifications/create/
///
/// ### Form fields
/// `title`, `message`, `target_role` (`all`, `student`, `faculty`, `admin`), `is_active` (checkbox)
///
/// ### Responses
/// - `303 See Other` → `/dashboard/` with `Notification created successfully!`
/// - `400 Bad Request` → `notification_form.html` with field errors, or with
///   `Faculty can only send notifications to students` for an audience the role may not address
pub async fn create_notification(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Form(form): Form<NotificationForm>,
) -> AppResult {
    ctx.require(Action::CreateNotification)?;

    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => {
            return Ok(Page::new(
                "notification_form.html",
                notification_form_context(ctx.role, &form, &errors),
            )
            .status(StatusCode::BAD_REQUEST)
            .render(jar));
        }
    };

    if !allowed_target_roles(ctx.role).contains(&clean.target_role) {
        tracing::warn!(
            user_id = ctx.user_id,
            target_role = %clean.target_role,
            "Rejected notification for a disallowed audience"
        );
        return Ok(Page::new(
            "notification_form.html",
            notification_form_context(ctx.role, &form, &FieldErrors::new()),
        )
        .status(StatusCode::BAD_REQUEST)
        .flash(FlashMessage::error("Faculty can only send notifications to students"))
        .render(jar));
    }

    let created = notification::Model::create(
        app_state.db(),
        ctx.user_id,
        &clean.title,
        &clean.message,
        clean.target_role,
        clean.is_active,
    )
    .await?;

    tracing::info!(notification_id = created.id, user_id = ctx.user_id, "Notification created");

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("Notification created successfully!"),
        "/dashboard/",
    ))
}
