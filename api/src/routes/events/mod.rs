//! # Events Routes
//!
//! - `GET /events/` (search with `?query=`)
//! - `GET /events/{event_id}/`
//! - `GET|POST /events/create/` (admin, faculty)
//! - `GET|POST /events/{event_id}/edit/` (admin, owning faculty)
//! - `POST /events/{event_id}/delete/` (admin, owning faculty)

use axum::{
    Router,
    routing::{get, post},
};
use get::{create_page, edit_page, event_detail, event_list};
use post::{create_event, delete_event, edit_event};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn events_routes() -> Router<AppState> {
    Router::new()
        .route("/events/", get(event_list))
        .route("/events/create/", get(create_page).post(create_event))
        .route("/events/{event_id}/", get(event_detail))
        .route("/events/{event_id}/edit/", get(edit_page).post(edit_event))
        .route("/events/{event_id}/delete/", post(delete_event))
}
