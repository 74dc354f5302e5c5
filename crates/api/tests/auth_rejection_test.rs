//! Request paths that must be decided before any database access: auth
//! rejection, role gating, input validation, and health degradation. These
//! run against a lazy pool pointing at nothing.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{bearer, build_offline_app, empty_request, json_request, send};

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _dir) = build_offline_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/v1/projects", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_authorization_header_is_unauthorized() {
    let (app, _dir) = build_offline_app();
    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/api/v1/progress", Some("Basic abc123")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (app, _dir) = build_offline_app();
    let (status, _) = send(
        &app,
        empty_request(
            Method::GET,
            "/api/v1/users/profile",
            Some("Bearer not-a-jwt"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_cannot_list_users() {
    let (app, _dir) = build_offline_app();
    let auth = bearer(7, "physical_staff", Some("UOC"));
    let (status, body) = send(
        &app,
        empty_request(Method::GET, "/api/v1/users", Some(&auth)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn staff_cannot_submit_progress() {
    let (app, _dir) = build_offline_app();
    let auth = bearer(7, "financial_staff", Some("UOC"));
    let (status, _) = send(
        &app,
        empty_request(Method::POST, "/api/v1/progress/1/submit", Some(&auth)),
    )
    .await;
    // RequireRegistrar rejects before the record is ever fetched.
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_display_currency_is_rejected() {
    let (app, _dir) = build_offline_app();
    let auth = bearer(1, "admin", None);
    let (status, body) = send(
        &app,
        empty_request(
            Method::GET,
            "/api/v1/projects?display_currency=XXX",
            Some(&auth),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn registration_validates_before_touching_storage() {
    let (app, _dir) = build_offline_app();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            &json!({
                "username": "x",
                "email": "not-an-email",
                "password": "password123",
                "role": "registrar"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            &json!({
                "username": "x",
                "email": "x@promis.test",
                "password": "short",
                "role": "registrar"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            &json!({
                "username": "x",
                "email": "x@promis.test",
                "password": "password123",
                "role": "clerk"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or("").contains("clerk"));
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let (app, _dir) = build_offline_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/health", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "down");
}
