//! One-shot messages carried across a redirect in the `flash` cookie.
//!
//! The cookie holds a JSON array. The jar percent-encodes it on the wire. It is
//! appended to on redirects and removed by the next rendered page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Messages waiting in the jar. A cookie that fails to decode counts as empty.
pub fn pending(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

pub fn push(jar: CookieJar, message: FlashMessage) -> CookieJar {
    let mut messages = pending(&jar);
    messages.push(message);

    let json = serde_json::to_string(&messages).unwrap_or_else(|_| "[]".into());

    jar.add(
        Cookie::build((FLASH_COOKIE, json))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Drains the pending messages, expiring the cookie when there was one.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }

    let messages = pending(&jar);
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

/// 303 redirect to `to`, queuing `message` for the page rendered there.
pub fn redirect_with(jar: CookieJar, message: FlashMessage, to: &str) -> Response {
    (push(jar, message), Redirect::to(to)).into_response()
}
