//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /                     -> list_users
/// GET /editors              -> list_editors
/// GET /writers              -> list_writers
/// GET /stats                -> user_stats
/// GET /{id}                 -> get_user
/// PUT /{id}/role            -> update_user_role
/// PUT /{id}/toggle-status   -> toggle_user_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/editors", get(users::list_editors))
        .route("/writers", get(users::list_writers))
        .route("/stats", get(users::user_stats))
        .route("/{id}", get(users::get_user))
        .route("/{id}/role", put(users::update_user_role))
        .route("/{id}/toggle-status", put(users::toggle_user_status))
}
