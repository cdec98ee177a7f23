use axum::{Form, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::user::{self, Profile};
use serde_json::json;
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::auth::session::{end_session, start_session};
use crate::error::AppResult;
use crate::response::{FlashMessage, Page, flash};
use crate::routes::auth::common::{
    LoginForm, RegisterForm, parse_self_service_role, register_context,
};
use crate::routes::common::is_unique_violation;

/// POST /register/
///
/// Creates the account, logs it in and redirects to the dashboard.
///
/// ### Form fields
/// `username`, `email`, `password1`, `password2`, `role`, `phone`, `enrollment_no`, `department`
///
/// ### Responses
/// - `303 See Other` → `/dashboard/` with `Account created successfully! Welcome {username}`
/// - `400 Bad Request` → `register.html` with field errors
pub async fn register(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult {
    let db = app_state.db();

    let mut errors = FieldErrors::new();
    if let Err(e) = form.validate() {
        errors.extend_from(&e);
    }

    let role = parse_self_service_role(&form.role)
        .map_err(|message| errors.add("role", message))
        .ok();

    let (username_taken, email_taken) =
        user::Model::identity_taken(db, &form.username, &form.email, None).await?;
    if username_taken {
        errors.add("username", "A user with that username already exists.");
    }
    if email_taken {
        errors.add("email", "A user with that email already exists.");
    }

    let rejected = |errors: FieldErrors| {
        Page::new("register.html", register_context(&form, &errors))
            .status(StatusCode::BAD_REQUEST)
            .flash(FlashMessage::error("Registration error. Please check the form."))
    };

    let Some(role) = role.filter(|_| errors.is_empty()) else {
        return Ok(rejected(errors).render(jar));
    };

    let profile = Profile {
        phone: Some(form.phone.clone()),
        enrollment_no: Some(form.enrollment_no.clone()),
        department: Some(form.department.clone()),
    };
    let user = match user::Model::create(db, &form.username, &form.email, &form.password1, role, profile).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            let mut errors = FieldErrors::new();
            errors.add_non_field("A user with that username or email already exists.");
            return Ok(rejected(errors).render(jar));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "Registered new account");

    let (token, _) = generate_jwt(user.id, user.role)?;
    Ok(flash::redirect_with(
        start_session(jar, token),
        FlashMessage::success(format!("Account created successfully! Welcome {}", user.username)),
        "/dashboard/",
    ))
}

/// POST /login/
///
/// ### Responses
/// - `303 See Other` → `/dashboard/` with `Welcome back, {username}!`
/// - `400 Bad Request` → `login.html` with `Invalid username or password`
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult {
    let Some(user) = user::Model::verify_credentials(app_state.db(), &form.username, &form.password).await? else {
        tracing::warn!(username = %form.username, "Failed login attempt");
        return Ok(Page::new("login.html", json!({ "form": form }))
            .status(StatusCode::BAD_REQUEST)
            .flash(FlashMessage::error("Invalid username or password"))
            .render(jar));
    };

    tracing::info!(user_id = user.id, "User logged in");

    let (token, _) = generate_jwt(user.id, user.role)?;
    Ok(flash::redirect_with(
        start_session(jar, token),
        FlashMessage::success(format!("Welcome back, {}!", user.username)),
        "/dashboard/",
    ))
}

/// GET|POST /logout/
pub async fn logout(jar: CookieJar) -> AppResult {
    Ok(flash::redirect_with(
        end_session(jar),
        FlashMessage::info("You have been logged out"),
        "/login/",
    ))
}
