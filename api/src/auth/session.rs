//! Session cookie helpers.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use util::config;

pub const SESSION_COOKIE: &str = "session";

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config::session_cookie_secure())
        .build()
}

/// Stores a freshly issued token on the jar.
pub fn start_session(jar: CookieJar, token: String) -> CookieJar {
    jar.add(session_cookie(token))
}

pub fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
