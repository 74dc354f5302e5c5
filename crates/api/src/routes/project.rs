use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(project::list_projects).post(project::create_project),
        )
        .route(
            "/projects/{reference}",
            get(project::get_project)
                .put(project::update_project)
                .delete(project::delete_project),
        )
}
