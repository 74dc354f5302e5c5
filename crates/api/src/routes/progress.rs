use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/progress",
            get(progress::list_progress).post(progress::create_progress),
        )
        // The GET parameter is a dual-purpose reference (record id, project
        // id, or project name); mutations require a plain record id.
        .route(
            "/progress/{reference}",
            get(progress::get_progress)
                .put(progress::update_progress)
                .patch(progress::patch_progress)
                .delete(progress::delete_progress),
        )
        .route("/progress/{reference}/submit", post(progress::submit_progress))
}
