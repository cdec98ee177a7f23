use crate::helpers::{body_json, get, make_test_app};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn health_is_public() {
    let (app, _) = make_test_app().await;

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
    assert_eq!(json["message"], "Health check passed");
}
