use axum::{Form, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use db::models::sessional_mark;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::Action;
use crate::error::AppResult;
use crate::response::{FlashMessage, Page, flash};
use crate::routes::common::is_unique_violation;
use crate::routes::marks::common::{DUPLICATE_MARK, MarkForm, mark_entry_context};

/// POST /marks/entry/
///
/// ### Form fields
/// `student`, `event` (ids), `marks_obtained`, `remarks`
///
/// ### Responses
/// - `303 See Other` → `/marks/entry/` with `Marks entered successfully!`
/// - `400 Bad Request` → `mark_entry.html` with field errors such as `Marks cannot exceed 50`
pub async fn enter_marks(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
    Form(form): Form<MarkForm>,
) -> AppResult {
    ctx.require(Action::EnterMarks)?;
    let db = app_state.db();

    let errors = match form.clean(db).await? {
        Ok(clean) => {
            match sessional_mark::Model::create(
                db,
                clean.student_id,
                clean.event.id,
                clean.marks_obtained,
                &clean.remarks,
                ctx.user_id,
            )
            .await
            {
                Ok(mark) => {
                    tracing::info!(
                        mark_id = mark.id,
                        student_id = mark.student_id,
                        event_id = mark.event_id,
                        entered_by = ctx.user_id,
                        "Marks entered"
                    );
                    return Ok(flash::redirect_with(
                        jar,
                        FlashMessage::success("Marks entered successfully!"),
                        "/marks/entry/",
                    ));
                }
                Err(e) if is_unique_violation(&e) => {
                    let mut errors = FieldErrors::new();
                    errors.add_non_field(DUPLICATE_MARK);
                    errors
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(errors) => errors,
    };

    let context = mark_entry_context(db, ctx.user_id, &form, &errors).await?;
    Ok(Page::new("mark_entry.html", context)
        .status(StatusCode::BAD_REQUEST)
        .render(jar))
}
