use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use rapido_api::router::build_router;
use rapido_api::state::AppState;

use crate::helpers::test_tokens;

/// Router over a disconnected database: only paths that never reach the
/// store are meaningful here.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::default(),
        tokens: test_tokens(),
        password_cost: 4,
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_serve_banner_and_liveness() {
    let server = server();

    let banner = server.get("/").await;
    banner.assert_status_ok();
    assert_eq!(banner.json::<Value>()["message"], "Rapido Backend API");

    server.get("/healthz").await.assert_status_ok();
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = server().get("/readyz").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_attach_request_id_to_responses() {
    let response = server().get("/healthz").await;
    let id = response.header("x-request-id");
    assert!(id.to_str().unwrap().parse::<uuid::Uuid>().is_ok());
}

#[tokio::test]
async fn should_require_bearer_token_on_protected_routes() {
    let server = server();
    for path in ["/users/0190a0e4-0000-7000-8000-000000000000", "/admin/rides"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");
    }

    let response = server
        .get("/admin/analytics/rides-per-day")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_invalid_input_for_malformed_bodies() {
    let server = server();

    let not_json = server
        .post("/signup")
        .content_type("application/json")
        .text("{ not json")
        .await;
    not_json.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(not_json.json::<Value>()["kind"], "INVALID_INPUT");

    let missing_password = server
        .post("/signup")
        .json(&json!({ "username": "rider", "email": "rider@example.com" }))
        .await;
    missing_password.assert_status(StatusCode::BAD_REQUEST);

    let bad_email = server
        .post("/signup")
        .json(&json!({
            "username": "rider",
            "email": "rider-at-example",
            "password": "secret123",
        }))
        .await;
    bad_email.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.json::<Value>()["message"], "email is not valid");
}
