//! Top-level router assembly and the shared middleware stack.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// Build the complete application router.
///
/// Layout: `GET /health` at the root, the versioned API under `/api/v1`,
/// and stored uploads served read-only under `/api/uploads`.
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .merge(routes::auth::router())
        .merge(routes::user::router())
        .merge(routes::project::router())
        .merge(routes::progress::router());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .nest_service(
            "/api/uploads",
            ServeDir::new(&state.config.upload_dir),
        )
        // Multipart bodies may carry several attachments at the 5 MiB cap;
        // the per-file limit is enforced in the upload handler.
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    state.config.request_timeout_secs,
                )))
                .layer(CatchPanicLayer::new())
                .layer(cors),
        )
        .with_state(state)
}
