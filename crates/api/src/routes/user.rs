use axum::routing::{get, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(user::list_users))
        .route(
            "/users/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route(
            "/users/{id}",
            put(user::update_user).delete(user::delete_user),
        )
}
