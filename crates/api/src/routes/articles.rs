//! Route definitions for the `/articles` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET    /               -> list_articles
/// POST   /               -> create_article
/// GET    /search         -> search_articles
/// GET    /stats          -> article_stats
/// GET    /{id}           -> get_article
/// PUT    /{id}           -> update_article
/// DELETE /{id}           -> delete_article
/// PUT    /{id}/submit    -> submit_article
/// PUT    /{id}/approve   -> approve_article
/// PUT    /{id}/reject    -> reject_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/search", get(articles::search_articles))
        .route("/stats", get(articles::article_stats))
        .route(
            "/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/{id}/submit", put(articles::submit_article))
        .route("/{id}/approve", put(articles::approve_article))
        .route("/{id}/reject", put(articles::reject_article))
}
