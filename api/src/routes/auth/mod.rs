//! # Session Routes
//!
//! - `GET|POST /register/`
//! - `GET|POST /login/`
//! - `GET|POST /logout/`
//!
//! All public. A successful register or login stores the session cookie.

use axum::{Router, routing::get};
use get::{login_page, register_page};
use post::{login, logout, register};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", get(register_page).post(register))
        .route("/login/", get(login_page).post(login))
        .route("/logout/", get(logout).post(logout))
}
