//! # User Administration Routes
//!
//! - `GET|POST /users/create/` (admin)
//! - `GET|POST /edit_user/{user_id}/` (admin)
//! - `POST /delete_user/{user_id}/` (admin, never the caller's own account)
//! - `GET|POST /password/` (any authenticated user, own password)

use axum::{
    Router,
    routing::{get, post},
};
use get::{create_user_page, edit_user_page, password_page};
use post::{change_password, create_user, delete_user, edit_user};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users/create/", get(create_user_page).post(create_user))
        .route("/edit_user/{user_id}/", get(edit_user_page).post(edit_user))
        .route("/delete_user/{user_id}/", post(delete_user))
        .route("/password/", get(password_page).post(change_password))
}
