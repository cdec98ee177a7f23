use axum::extract::{Path, Query, State};
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::{event, sessional_mark, user::Role};
use serde::{Deserialize, Serialize};
use serde_json::json;
use util::state::AppState;
use validator::Validate;

use crate::auth::RequestContext;
use crate::auth::policy::{self, Action};
use crate::error::{AppError, AppResult};
use crate::response::Page;
use crate::routes::events::common::{EventForm, event_form_context};

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct SearchForm {
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub query: String,
}

/// GET /events/?query=
///
/// Lists every event, newest date first. A non-blank `query` filters on title,
/// description and venue. An over-long query is reported and ignored.
pub async fn event_list(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Query(search): Query<SearchForm>,
) -> AppResult {
    let db = app_state.db();

    let (events, errors) = match search.validate() {
        Ok(()) => (event::Model::search(db, &search.query).await?, FieldErrors::new()),
        Err(e) => (event::Model::find_all(db).await?, FieldErrors::from(&e)),
    };

    Ok(Page::new(
        "event_list.html",
        json!({
            "events": events,
            "search_form": { "query": search.query, "errors": errors },
            "can_create": policy::allows(ctx.role, Action::CreateEvent),
        }),
    )
    .render(jar))
}

/// GET /events/{event_id}/
///
/// Students only see their own mark on the event.
pub async fn event_detail(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Path(event_id): Path<i64>,
) -> AppResult {
    let db = app_state.db();
    let event = event::Model::find_by_id(db, event_id)
        .await?
        .ok_or(AppError::NotFound("Event"))?;

    let mut marks = sessional_mark::Model::for_event_with_student(db, event.id).await?;
    if ctx.role == Role::Student {
        marks.retain(|m| m.mark.student_id == ctx.user_id);
    }
    let assigned_students = event::Model::assigned_student_ids(db, event.id).await?;

    Ok(Page::new(
        "event_detail.html",
        json!({
            "can_modify": policy::can_modify_event(&ctx, &event),
            "event": event,
            "marks": marks,
            "assigned_students": assigned_students,
        }),
    )
    .render(jar))
}

/// GET /events/create/
pub async fn create_page(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
) -> AppResult {
    ctx.require(Action::CreateEvent)?;

    let context = event_form_context(
        app_state.db(),
        &EventForm::default(),
        &FieldErrors::new(),
        "Create Event",
        None,
    )
    .await?;
    Ok(Page::new("event_form.html", context).render(jar))
}

/// GET /events/{event_id}/edit/
pub async fn edit_page(
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
            "You do not have permission to edit this event".into(),
        ));
    }

    let assigned = event::Model::assigned_student_ids(db, event.id).await?;
    let form = EventForm::from_model(&event, &assigned);
    let context =
        event_form_context(db, &form, &FieldErrors::new(), "Edit Event", Some(&event)).await?;
    Ok(Page::new("event_form.html", context).render(jar))
}
