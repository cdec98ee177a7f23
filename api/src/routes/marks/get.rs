use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use common::FieldErrors;
use util::state::AppState;

use crate::auth::RequestContext;
use crate::auth::policy::Action;
use crate::error::AppResult;
use crate::response::Page;
use crate::routes::marks::common::{MarkForm, mark_entry_context};

/// GET /marks/entry/
///
/// Empty entry form plus the actor's ten latest entries.
pub async fn mark_entry_page(
    State(app_state): State<AppState>,
    jar: CookieJar,
    ctx: RequestContext,
) -> AppResult {
    ctx.require(Action::EnterMarks)?;

    let context = mark_entry_context(
        app_state.db(),
        ctx.user_id,
        &MarkForm::default(),
        &FieldErrors::new(),
    )
    .await?;
    Ok(Page::new("mark_entry.html", context).render(jar))
}
