//! # Notifications Routes
//!
//! - `GET /notifications/` (notifications addressed to the caller's role)
//! - `GET|POST /notifications/create/` (admin any audience, faculty all/students)

use axum::{Router, routing::get};
use get::{create_page, notification_list};
use post::create_notification;
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn notifications_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications/", get(notification_list))
        .route(
            "/notifications/create/",
            get(create_page).post(create_notification),
        )
}
