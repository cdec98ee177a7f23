use axum::extract::{Path, State};
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::user;
use serde_json::json;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::Action;
use crate::error::{AppError, AppResult};
use crate::response::Page;
use crate::routes::auth::common::RegisterForm;
use crate::routes::users::common::{EditUserForm, user_form_context};

/// GET /users/create/
pub async fn create_user_page(jar: CookieJar, ctx: RequestContext) -> AppResult {
    ctx.require(Action::ManageUsers)?;

    let context = user_form_context(&RegisterForm::default(), &FieldErrors::new(), json!({}));
    Ok(Page::new("user_form.html", context).render(jar))
}

/// GET /edit_user/{user_id}/
pub async fn edit_user_page(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Path(user_id): Path<i64>,
) -> AppResult {
    ctx.require(Action::ManageUsers)?;

    let user = user::Model::find_by_id(app_state.db(), user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let form = EditUserForm::from_model(&user);
    let context = user_form_context(&form, &FieldErrors::new(), json!({ "user": user }));
    Ok(Page::new("edit_user.html", context).render(jar))
}

/// GET /password/
pub async fn password_page(jar: CookieJar, ctx: RequestContext) -> AppResult {
    Ok(Page::new(
        "password_change.html",
        json!({ "user": ctx, "errors": FieldErrors::new() }),
    )
    .render(jar))
}
