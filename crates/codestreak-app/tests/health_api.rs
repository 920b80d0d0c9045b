//! Health endpoint and middleware behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

#[tokio::test]
async fn health_check_reports_version_and_ticker_state() {
    let app = common::build_test_app().await;

    let response = get(app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["schedulerRunning"], false);
    assert!(json["lastTickSlot"].is_null());
}

#[tokio::test]
async fn health_check_reports_last_claimed_tick() {
    let app = common::build_test_app().await;

    let response = get(app.app(), "/api/cron/start").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app.app(), "/health").await).await;
    assert_eq!(json["lastTickSlot"], "2026-10-15 21:00");
}

#[tokio::test]
async fn response_carries_request_id() {
    let app = common::build_test_app().await;

    let response = get(app.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app().await;

    let response = get(app.app(), "/api/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
