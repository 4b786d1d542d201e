pub mod articles;
pub mod auth;
pub mod health;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket (?token=<jwt>)
///
/// /auth/register                        register (public)
/// /auth/login                           login (public)
/// /auth/me                              current user (requires auth)
///
/// /articles                             list (optional auth), create (writer)
/// /articles/search                      public title search
/// /articles/stats                       newsroom stats (admin)
/// /articles/{id}                        get (optional auth), update, delete
/// /articles/{id}/submit                 submit for review (author)
/// /articles/{id}/approve                approve (assigned editor)
/// /articles/{id}/reject                 reject (assigned editor)
///
/// /users                                list (admin)
/// /users/editors                        active editors (writer, editor, admin)
/// /users/writers                        writers (editor, admin)
/// /users/stats                          user stats (admin)
/// /users/{id}                           get (admin)
/// /users/{id}/role                      change role (admin)
/// /users/{id}/toggle-status             activate/deactivate (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // Auth
        .nest("/auth", auth::router())
        // Articles
        .nest("/articles", articles::router())
        // Users
        .nest("/users", users::router())
}
