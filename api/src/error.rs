use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::DbErr;
use thiserror::Error;

use crate::response::{FlashMessage, Page, flash};

/// Failures a handler can bail out with.
///
/// Form validation errors are not here: handlers render those themselves so the
/// submitted values can be shown again.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,

    /// Rendered as a flash error and a redirect to the dashboard.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub type AppResult<T = Response> = Result<T, AppError>;

/// Attached to the redirect built for [`AppError::Forbidden`].
///
/// The error has no access to the request cookies, so
/// [`crate::auth::guards::allow_authenticated`] rebuilds the redirect from the
/// request jar to keep messages that were already pending.
#[derive(Debug, Clone)]
pub struct Denied(pub FlashMessage);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => Redirect::to("/login/").into_response(),
            AppError::Forbidden(message) => {
                let message = FlashMessage::error(message);
                let mut response =
                    flash::redirect_with(CookieJar::new(), message.clone(), "/dashboard/");
                response.extensions_mut().insert(Denied(message));
                response
            }
            AppError::NotFound(_) => Page::not_found().render(CookieJar::new()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                Page::server_error().render(CookieJar::new())
            }
            AppError::Token(e) => {
                tracing::error!(error = %e, "Failed to issue session token");
                Page::server_error().render(CookieJar::new())
            }
        }
    }
}
