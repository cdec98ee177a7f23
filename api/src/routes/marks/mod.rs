//! # Marks Routes
//!
//! - `GET|POST /marks/entry/` (admin, faculty)

use axum::{Router, routing::get};
use get::mark_entry_page;
use post::enter_marks;
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn marks_routes() -> Router<AppState> {
    Router::new().route("/marks/entry/", get(mark_entry_page).post(enter_marks))
}
