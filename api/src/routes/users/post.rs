use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::user::{self, Profile, UserChanges};
use serde_json::json;
use util::state::AppState;
use validator::Validate;

use crate::auth::RequestContext;
use crate::auth::policy::Action;
use crate::error::{AppError, AppResult};
use crate::response::{FlashMessage, Page, flash};
use crate::routes::auth::common::RegisterForm;
use crate::routes::common::is_unique_violation;
use crate::routes::users::common::{EditUserForm, PasswordForm, parse_role, user_form_context};

fn duplicate_identity(errors: &mut FieldErrors, (username_taken, email_taken): (bool, bool)) {
    if username_taken {
        errors.add("username", "A user with that username already exists.");
    }
    if email_taken {
        errors.add("email", "A user with that email already exists.");
    }
}

/// POST /users/create/
///
/// Same fields as registration, but any role may be chosen.
pub async fn create_user(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Form(form): Form<RegisterForm>,
) -> AppResult {
    ctx.require(Action::ManageUsers)?;
    let db = app_state.db();

    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.extend_from(&e);
    }
    let role = parse_role(&form.role, &mut errors);
    duplicate_identity(
        &mut errors,
        user::Model::identity_taken(db, &form.username, &form.email, None).await?,
    );

    let rejected = |errors: &FieldErrors| {
        Page::new("user_form.html", user_form_context(&form, errors, json!({})))
            .status(StatusCode::BAD_REQUEST)
    };

    let Some(role) = role.filter(|_| errors.is_empty()) else {
        return Ok(rejected(&errors).render(jar));
    };

    let profile = Profile {
        phone: Some(form.phone.clone()),
        enrollment_no: Some(form.enrollment_no.clone()),
        department: Some(form.department.clone()),
    };
    let created = match user::Model::create(db, &form.username, &form.email, &form.password1, role, profile).await {
        Ok(created) => created,
        Err(e) if is_unique_violation(&e) => {
            let mut errors = FieldErrors::new();
            errors.add_non_field("A user with that username or email already exists.");
            return Ok(rejected(&errors).render(jar));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        actor_id = ctx.user_id,
        user_id = created.id,
        role = %created.role,
        "Admin created user"
    );

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success(format!("User {} created successfully.", created.username)),
        "/dashboard/",
    ))
}

/// POST /edit_user/{user_id}/
///
/// Replaces username, email, role and profile fields. Role changes are logged.
pub async fn edit_user(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Path(user_id): Path<i64>,
    Form(form): Form<EditUserForm>,
) -> AppResult {
    ctx.require(Action::ManageUsers)?;
    let db = app_state.db();

    let user = user::Model::find_by_id(db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.extend_from(&e);
    }
    let role = parse_role(&form.role, &mut errors);
    duplicate_identity(
        &mut errors,
        user::Model::identity_taken(db, &form.username, &form.email, Some(user.id)).await?,
    );

    let rejected = |errors: &FieldErrors| {
        Page::new(
            "edit_user.html",
            user_form_context(&form, errors, json!({ "user": &user })),
        )
        .status(StatusCode::BAD_REQUEST)
    };

    let Some(role) = role.filter(|_| errors.is_empty()) else {
        return Ok(rejected(&errors).render(jar));
    };

    let changes = UserChanges {
        username: form.username.clone(),
        email: form.email.clone(),
        role,
        profile: Profile {
            phone: Some(form.phone.clone()),
            enrollment_no: Some(form.enrollment_no.clone()),
            department: Some(form.department.clone()),
        },
    };
    let updated = match user::Model::update(db, user.id, changes).await {
        Ok(updated) => updated,
        Err(e) if is_unique_violation(&e) => {
            let mut errors = FieldErrors::new();
            errors.add_non_field("A user with that username or email already exists.");
            return Ok(rejected(&errors).render(jar));
        }
        Err(e) => return Err(e.into()),
    };

    if updated.role != user.role {
        tracing::warn!(
            actor_id = ctx.user_id,
            user_id = updated.id,
            from = %user.role,
            to = %updated.role,
            "User role changed"
        );
    }

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("User details updated successfully."),
        "/dashboard/",
    ))
}

/// POST /delete_user/{user_id}/
///
/// Removes the account together with its events, marks and notifications.
pub async fn delete_user(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Path(user_id): Path<i64>,
) -> AppResult {
    ctx.require(Action::ManageUsers)?;
    let db = app_state.db();

    let user = user::Model::find_by_id(db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if user.id == ctx.user_id {
        return Err(AppError::Forbidden(
            "You cannot delete your own account".into(),
        ));
    }

    user::Model::delete_with_dependents(db, user.id).await?;

    tracing::warn!(
        actor_id = ctx.user_id,
        user_id = user.id,
        username = %user.username,
        "User deleted"
    );

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("User deleted."),
        "/dashboard/",
    ))
}

/// POST /password/
///
/// ### Form fields
/// `old_password`, `new_password1`, `new_password2`
pub async fn change_password(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Form(form): Form<PasswordForm>,
) -> AppResult {
    let db = app_state.db();
    let user = user::Model::find_by_id(db, ctx.user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    let mut errors = FieldErrors::new();
    if !user.verify_password(&form.old_password) {
        errors.add(
            "old_password",
            "Your old password was entered incorrectly. Please enter it again.",
        );
    }
    if let Err(e) = form.validate() {
        errors.extend_from(&e);
    }

    if !errors.is_empty() {
        return Ok(Page::new(
            "password_change.html",
            json!({ "user": ctx, "errors": errors }),
        )
        .status(StatusCode::BAD_REQUEST)
        .render(jar));
    }

    user::Model::set_password(db, user.id, &form.new_password1).await?;
    tracing::info!(user_id = user.id, "Password changed");

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("Your password was changed successfully."),
        "/dashboard/",
    ))
}
