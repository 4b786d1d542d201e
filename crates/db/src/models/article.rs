//! Article entity model and DTOs.

use newsdesk_core::access::VisibilityScope;
use newsdesk_core::article::ArticleStatus;
use newsdesk_core::types::{DbId, Timestamp};
use newsdesk_core::workflow::ArticleSnapshot;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub author_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: ArticleStatus,
    pub assigned_editor_id: Option<DbId>,
    pub approved_by_id: Option<DbId>,
    pub rejection_comment: String,
    pub submitted_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    /// The fields the review state machine decides on.
    pub fn snapshot(&self) -> ArticleSnapshot {
        ArticleSnapshot {
            status: self.status,
            author_id: self.author_id,
            assigned_editor_id: self.assigned_editor_id,
        }
    }
}

/// An article joined with the names and emails of the people involved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub article: Article,
    pub author_name: String,
    pub author_email: String,
    pub assigned_editor_name: Option<String>,
    pub assigned_editor_email: Option<String>,
    pub approved_by_name: Option<String>,
    pub approved_by_email: Option<String>,
}

/// DTO for inserting a draft. Title and content are already normalized.
#[derive(Debug)]
pub struct CreateArticle {
    pub title: String,
    pub content: String,
    pub author_id: DbId,
}

/// DTO for editing a draft or rejected article. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Filters for [`crate::repositories::ArticleRepo::list`].
///
/// `scope` always applies; the other filters narrow it further.
#[derive(Debug, Clone)]
pub struct ArticleFilter {
    pub scope: VisibilityScope,
    pub status: Option<ArticleStatus>,
    pub author_id: Option<DbId>,
    pub editor_id: Option<DbId>,
    pub search: Option<String>,
}

impl ArticleFilter {
    pub fn new(scope: VisibilityScope) -> Self {
        Self {
            scope,
            status: None,
            author_id: None,
            editor_id: None,
            search: None,
        }
    }
}

/// Number of articles in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    #[sqlx(try_from = "String")]
    pub status: ArticleStatus,
    pub count: i64,
}

/// Article count for one author, used by the newsroom stats.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuthorCount {
    pub author_id: DbId,
    pub author_name: String,
    pub count: i64,
}
