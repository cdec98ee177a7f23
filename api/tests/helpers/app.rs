use api::auth::generate_jwt;
use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use db::models::user::{self, Profile, Role};
use db::test_utils::setup_test_db;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use util::state::AppState;

/// Fresh router over a migrated in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db);
    (routes(app_state.clone()), app_state)
}

pub async fn create_user(app_state: &AppState, username: &str, role: Role) -> user::Model {
    user::Model::create(
        app_state.db(),
        username,
        &format!("{username}@example.com"),
        "password123",
        role,
        Profile::default(),
    )
    .await
    .expect("Failed to create user")
}

/// `Cookie` header value carrying a valid session for `user`.
pub fn session_cookie(user: &user::Model) -> String {
    let (token, _) = generate_jwt(user.id, user.role).expect("Failed to sign token");
    format!("session={token}")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Messages queued in the `flash` cookie set by a redirect.
pub fn flash_messages(response: &Response<Body>) -> Vec<Value> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.strip_prefix("flash="))
        .filter_map(|v| v.split(';').next())
        .filter_map(|v| percent_decode_str(v).decode_utf8().ok().map(|s| s.into_owned()))
        .filter_map(|raw| serde_json::from_str::<Vec<Value>>(&raw).ok())
        .flatten()
        .collect()
}
