//! HTTP route entry point.
//!
//! Route groups:
//! - `/`, `/health`, `/register/`, `/login/`, `/logout/` → public
//! - `/dashboard/`, `/events/...`, `/marks/...`, `/notifications/...`,
//!   `/request_reval/`, user administration and `/password/` → behind
//!   [`allow_authenticated`], which redirects anonymous callers to `/login/`
//!
//! Role checks happen inside the handlers through [`crate::auth::policy`].

use axum::{Router, middleware::from_fn_with_state};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    auth::auth_routes, dashboard::dashboard_routes, events::events_routes,
    health::health_routes, home::home_routes, marks::marks_routes,
    notifications::notifications_routes, requests::requests_routes, users::users_routes,
};

pub mod auth;
pub mod common;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod home;
pub mod marks;
pub mod notifications;
pub mod requests;
pub mod users;

/// Builds the complete application router, with state applied.
pub fn routes(app_state: AppState) -> Router {
    let protected = Router::new()
        .merge(dashboard_routes())
        .merge(events_routes())
        .merge(marks_routes())
        .merge(notifications_routes())
        .merge(requests_routes())
        .merge(users_routes())
        .route_layer(from_fn_with_state(app_state.clone(), allow_authenticated));

    Router::new()
        .merge(home_routes())
        .merge(health_routes())
        .merge(auth_routes())
        .merge(protected)
        .with_state(app_state)
}
