use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde_json::{Value, json};

use crate::response::ApiResponse;
use crate::response::flash::{self, FlashMessage};

/// What the template renderer receives: the template name, the flash messages
/// to show once and the template context.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub template: &'static str,
    pub messages: Vec<FlashMessage>,
    pub context: Value,
}

/// Builder for a rendered page.
///
/// ```ignore
/// Page::new("event_list.html", json!({ "events": events })).render(jar)
/// ```
#[derive(Debug)]
pub struct Page {
    template: &'static str,
    status: StatusCode,
    context: Value,
    messages: Vec<FlashMessage>,
}

impl Page {
    pub fn new(template: &'static str, context: Value) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            context,
            messages: Vec::new(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Shows `message` on this page without a redirect round-trip.
    pub fn flash(mut self, message: FlashMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn not_found() -> Self {
        Page::new("404.html", json!({})).status(StatusCode::NOT_FOUND)
    }

    pub fn server_error() -> Self {
        Page::new("500.html", json!({})).status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Consumes the pending flash messages of `jar` and renders the page.
    pub fn render(self, jar: CookieJar) -> Response {
        let (jar, mut messages) = flash::take(jar);
        messages.extend(self.messages);

        let view = PageView {
            template: self.template,
            messages,
            context: self.context,
        };
        let message = self.status.canonical_reason().unwrap_or("OK");
        let body = if self.status.is_success() {
            ApiResponse::success(view, message)
        } else {
            ApiResponse::failure(view, message)
        };

        (self.status, jar, Json(body)).into_response()
    }
}
