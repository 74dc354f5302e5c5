//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use promis_api::auth::jwt::{generate_access_token, JwtConfig};
use promis_api::auth::password::hash_password;
use promis_api::config::ServerConfig;
use promis_api::router::build_router;
use promis_api::state::AppState;
use promis_core::types::DbId;
use promis_db::models::user::{CreateUser, User};
use promis_db::repositories::user_repo::UserRepo;
use promis_db::DbPool;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-long-enough";

pub fn test_config(upload_dir: std::path::PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 30,
        upload_dir,
        allow_submission_revert: false,
        jwt: JwtConfig {
            secret: TEST_SECRET.into(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the app against a real pool. Keep the returned `TempDir` alive for
/// the duration of the test; uploads land inside it.
pub fn build_app(pool: DbPool) -> (Router, TempDir) {
    let dir = TempDir::new().expect("temp upload dir");
    let state = AppState {
        pool,
        config: Arc::new(test_config(dir.path().to_path_buf())),
    };
    (build_router(state), dir)
}

/// Build the app with a lazy pool pointing nowhere. Request paths that are
/// rejected before touching the database stay testable without Postgres.
pub fn build_offline_app() -> (Router, TempDir) {
    let pool = promis_db::create_lazy_pool("postgres://nobody@127.0.0.1:1/absent")
        .expect("lazy pool");
    build_app(pool)
}

/// Mint a valid bearer token for an arbitrary identity.
pub fn bearer(user_id: DbId, role: &str, institution: Option<&str>) -> String {
    let config = test_config(std::env::temp_dir());
    let token = generate_access_token(user_id, role, institution, &config.jwt)
        .expect("token generation");
    format!("Bearer {token}")
}

/// Insert a user directly, returning the row. Password is always
/// `password123`.
pub async fn create_user(
    pool: &DbPool,
    username: &str,
    role: &str,
    institution: Option<&str>,
) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@promis.test"),
            password_hash: hash_password("password123").expect("hash"),
            role: role.to_string(),
            institution_id: institution.map(String::from),
        },
    )
    .await
    .expect("create test user")
}

pub fn json_request(method: Method, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request build")
}

pub fn empty_request(method: Method, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).expect("request build")
}

const BOUNDARY: &str = "promis-test-boundary";

/// Build a multipart request carrying plain text fields.
pub fn multipart_request(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    fields: &[(&str, &str)],
) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).expect("request build")
}

/// Build a multipart request carrying text fields plus one file part.
pub fn multipart_request_with_file(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    fields: &[(&str, &str)],
    file_field: &str,
    filename: &str,
    content: &[u8],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{file_field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).expect("request build")
}

/// Send a request through the router and decode the JSON body (if any).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
