use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::notification;
use serde_json::json;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::{self, Action};
use crate::error::AppResult;
use crate::response::Page;
use crate::routes::notifications::common::{NotificationForm, notification_form_context};

/// GET /notifications/
///
/// Notifications addressed to everyone or to the caller's role, newest first.
/// Admins see every notification, inactive ones included.
pub async fn notification_list(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
) -> AppResult {
    let notifications = notification::Model::list_for_role(app_state.db(), ctx.role).await?;

    Ok(Page::new(
        "notifications.html",
        json!({
            "notifications": notifications,
            "can_create": policy::allows(ctx.role, Action::CreateNotification),
        }),
    )
    .render(jar))
}

/// GET /notifications/create/
pub async fn create_page(jar: CookieJar, ctx: RequestContext) -> AppResult {
    ctx.require(Action::CreateNotification)?;

    let context =
        notification_form_context(ctx.role, &NotificationForm::default(), &FieldErrors::new());
    Ok(Page::new("notification_form.html", context).render(jar))
}
