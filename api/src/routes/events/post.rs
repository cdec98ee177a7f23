use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Form, cookie::CookieJar};
use db::models::event;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::{self, Action};
use crate::error::{AppError, AppResult};
use crate::response::{FlashMessage, Page, flash};
use crate::routes::events::common::{EventForm, event_form_context};

/// POST /events/create/
///
/// ### Responses
/// - `303 See Other` → `/events/` with `Event created successfully!`
/// - `303 See Other` → `/dashboard/` when the role may not create events
/// - `400 Bad Request` → `event_form.html` with field errors
pub async fn create_event(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Form(form): Form<EventForm>,
) -> AppResult {
    ctx.require(Action::CreateEvent)?;
    let db = app_state.db();

    let clean = match form.clean(db, None).await? {
        Ok(clean) => clean,
        Err(errors) => {
            let context = event_form_context(db, &form, &errors, "Create Event", None).await?;
            return Ok(Page::new("event_form.html", context)
                .status(StatusCode::BAD_REQUEST)
                .render(jar));
        }
    };

    let event = event::Model::create(db, ctx.user_id, clean.fields).await?;
    event::Model::set_assigned_students(db, event.id, &clean.assigned_students).await?;

    tracing::info!(event_id = event.id, user_id = ctx.user_id, "Event created");

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("Event created successfully!"),
        "/events/",
    ))
}

/// POST /events/{event_id}/edit/
///
/// ### Responses
/// - `303 See Other` → `/dashboard/` with `Event updated successfully!`
/// - `303 See Other` → `/dashboard/` with an error when the actor does not own the event
/// - `400 Bad Request` → `event_form.html` with field errors
/// - `404 Not Found`
pub async fn edit_event(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Path(event_id): Path<i64>,
    Form(form): Form<EventForm>,
) -> AppResult {
    let db = app_state.db();
    let event = event::Model::find_by_id(db, event_id)
        .await?
        .ok_or(AppError::NotFound("Event"))?;

    if !policy::can_modify_event(&ctx, &event) {
        return Err(AppError::Forbidden(
            "You do not have permission to edit this event".into(),
        ));
    }

    let clean = match form.clean(db, Some(&event)).await? {
        Ok(clean) => clean,
        Err(errors) => {
            let context = event_form_context(db, &form, &errors, "Edit Event", Some(&event)).await?;
            return Ok(Page::new("event_form.html", context)
                .status(StatusCode::BAD_REQUEST)
                .render(jar));
        }
    };

    event::Model::update(db, event.id, clean.fields).await?;
    event::Model::set_assigned_students(db, event.id, &clean.assigned_students).await?;

    tracing::info!(event_id = event.id, user_id = ctx.user_id, "Event updated");

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("Event updated successfully!"),
        "/dashboard/",
    ))
}

/// POST /events/{event_id}/delete/
///
/// Removes the event with its marks and assignments.
pub async fn delete_event(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Path(event_id): Path<i64>,
) -> AppResult {
    let db = app_state.db();
    let event = event::Model::find_by_id(db, event_id)
        .await?
        .ok_or(AppError::NotFound("Event"))?;

    if !policy::can_modify_event(&ctx, &event) {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this event".into(),
        ));
    }

    event::Model::delete_with_marks(db, event.id).await?;

    tracing::info!(event_id = event.id, user_id = ctx.user_id, title = %event.title, "Event deleted");

    Ok(flash::redirect_with(
        jar,
        FlashMessage::success("Event deleted successfully!"),
        "/dashboard/",
    ))
}
