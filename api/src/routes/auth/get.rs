use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use serde_json::json;

use crate::error::AppResult;
use crate::response::Page;
use crate::routes::auth::common::{RegisterForm, register_context};

/// GET /register/
pub async fn register_page(jar: CookieJar) -> AppResult {
    let form = RegisterForm::default();
    Ok(Page::new("register.html", register_context(&form, &FieldErrors::new())).render(jar))
}

/// GET /login/
pub async fn login_page(jar: CookieJar) -> AppResult {
    Ok(Page::new("login.html", json!({ "form": { "username": "" } })).render(jar))
}
