//! `GET /dashboard/`: one page per role, recomputed on every request.

use axum::{Router, extract::State, routing::get};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use db::models::user::{self, Role};
use db::models::{event, notification, sessional_mark};
use serde_json::json;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::Action;
use crate::error::AppResult;
use crate::response::Page;

/// Notifications shown on any dashboard.
pub const DASHBOARD_NOTIFICATIONS: u64 = 5;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/", get(dashboard))
}

/// GET /dashboard/
///
/// - student: own marks with percentage, upcoming visible events, own mark count
/// - faculty: authored events, marks entered by them
/// - admin: every user, event and mark with totals
///
/// All three include the latest active notifications addressed to the role.
pub async fn dashboard(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
) -> AppResult {
    let db = app_state.db();
    let notifications =
        notification::Model::active_for_role(db, ctx.role, DASHBOARD_NOTIFICATIONS).await?;

    let page = match ctx.role {
        Role::Student => {
            ctx.require(Action::ViewOwnRecords)?;
            let marks = sessional_mark::Model::for_student_with_event(db, ctx.user_id).await?;
            let today = Utc::now().date_naive();
            let upcoming_events = event::Model::upcoming_for_student(db, ctx.user_id, today).await?;

            Page::new(
                "student_dashboard.html",
                json!({
                    "user": ctx,
                    "total_events": marks.len(),
                    "marks": marks,
                    "upcoming_events": upcoming_events,
                    "notifications": notifications,
                }),
            )
        }
        Role::Faculty => {
            let events = event::Model::find_by_creator(db, ctx.user_id).await?;
            let total_marks_entered = sessional_mark::Model::count_entered_by(db, ctx.user_id).await?;

            Page::new(
                "faculty_dashboard.html",
                json!({
                    "user": ctx,
                    "total_events": events.len(),
                    "events": events,
                    "total_marks_entered": total_marks_entered,
                    "notifications": notifications,
                }),
            )
        }
        Role::Admin => {
            let users = user::Model::find_all(db).await?;
            let events = event::Model::find_all(db).await?;
            let marks = sessional_mark::Model::find_all_detailed(db).await?;
            let total_students = user::Model::count_by_role(db, Role::Student).await?;
            let total_faculty = user::Model::count_by_role(db, Role::Faculty).await?;

            Page::new(
                "admin_dashboard.html",
                json!({
                    "user": ctx,
                    "total_users": users.len(),
                    "total_students": total_students,
                    "total_faculty": total_faculty,
                    "total_events": events.len(),
                    "total_marks": marks.len(),
                    "users": users,
                    "events": events,
                    "marks": marks,
                    "notifications": notifications,
                }),
            )
        }
    };

    Ok(page.render(jar))
}
