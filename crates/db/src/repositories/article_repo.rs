//! Repository for the `articles` table.

use newsdesk_core::access::VisibilityScope;
use newsdesk_core::article::STATUS_APPROVED;
use newsdesk_core::types::DbId;
use newsdesk_core::workflow::ReviewChange;
use sqlx::PgPool;

use crate::models::article::{
    Article, ArticleDetail, ArticleFilter, AuthorCount, CreateArticle, StatusCount, UpdateArticle,
};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, title, content, author_id, status, assigned_editor_id, \
                       approved_by_id, rejection_comment, submitted_at, reviewed_at, \
                       created_at, updated_at";

/// SELECT list and joins for [`ArticleDetail`] rows. Article columns are
/// qualified with `a.`; filters should use the same alias.
const DETAIL_SELECT: &str = "\
    SELECT a.id, a.title, a.content, a.author_id, a.status, a.assigned_editor_id, \
           a.approved_by_id, a.rejection_comment, a.submitted_at, a.reviewed_at, \
           a.created_at, a.updated_at, \
           au.name AS author_name, au.email AS author_email, \
           ed.name AS assigned_editor_name, ed.email AS assigned_editor_email, \
           ap.name AS approved_by_name, ap.email AS approved_by_email \
    FROM articles a \
    JOIN users au ON au.id = a.author_id \
    LEFT JOIN users ed ON ed.id = a.assigned_editor_id \
    LEFT JOIN users ap ON ap.id = a.approved_by_id";

/// Provides CRUD and review operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new draft, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles (title, content, author_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an article by ID together with author, editor and approver details.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ArticleDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, ArticleDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List articles visible under `filter.scope`, narrowed by the optional
    /// filters, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleDetail>, sqlx::Error> {
        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        match filter.scope {
            VisibilityScope::ApprovedOnly => {
                conditions.push(format!("a.status = '{STATUS_APPROVED}'"));
            }
            VisibilityScope::AuthoredBy(_) => {
                conditions.push(format!("a.author_id = ${bind_idx}"));
                bind_idx += 1;
            }
            VisibilityScope::ReviewedBy(_) => {
                conditions.push(format!(
                    "(a.assigned_editor_id = ${bind_idx} OR a.approved_by_id = ${bind_idx})"
                ));
                bind_idx += 1;
            }
            VisibilityScope::Everything => {}
        }

        let status = filter
            .status
            .filter(|_| filter.scope.allows_status_filter());
        if status.is_some() {
            conditions.push(format!("a.status = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.author_id.is_some() {
            conditions.push(format!("a.author_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.editor_id.is_some() {
            conditions.push(format!("a.assigned_editor_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!("a.title ILIKE ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("{DETAIL_SELECT} {where_clause} ORDER BY a.created_at DESC, a.id DESC");
        tracing::debug!(scope = ?filter.scope, %where_clause, "Listing articles");

        let mut q = sqlx::query_as::<_, ArticleDetail>(&query);

        // Bind dynamic parameters in order.
        match filter.scope {
            VisibilityScope::AuthoredBy(id) | VisibilityScope::ReviewedBy(id) => {
                q = q.bind(id);
            }
            VisibilityScope::ApprovedOnly | VisibilityScope::Everything => {}
        }
        if let Some(status) = status {
            q = q.bind(status.as_str());
        }
        if let Some(author_id) = filter.author_id {
            q = q.bind(author_id);
        }
        if let Some(editor_id) = filter.editor_id {
            q = q.bind(editor_id);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(contains_pattern(search));
        }

        q.fetch_all(pool).await
    }

    /// Case-insensitive title search over approved articles, newest first.
    pub async fn search_approved(
        pool: &PgPool,
        text: &str,
        limit: i64,
    ) -> Result<Vec<ArticleDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE a.status = '{STATUS_APPROVED}' AND a.title ILIKE $1
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ArticleDetail>(&query)
            .bind(contains_pattern(text))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Rewrite title and/or content. Returns `None` if the row does not exist.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                content = COALESCE($3, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.content.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Write the review columns decided by the state machine in one statement.
    ///
    /// Returns `None` if the row does not exist.
    pub async fn apply_review(
        pool: &PgPool,
        id: DbId,
        change: &ReviewChange,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                status = $2,
                assigned_editor_id = COALESCE($3, assigned_editor_id),
                approved_by_id = $4,
                rejection_comment = $5,
                submitted_at = COALESCE($6, submitted_at),
                reviewed_at = COALESCE($7, reviewed_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(change.status.as_str())
            .bind(change.assigned_editor_id)
            .bind(change.approved_by_id)
            .bind(&change.rejection_comment)
            .bind(change.submitted_at)
            .bind(change.reviewed_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete an article by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// Total number of articles.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(pool)
            .await
    }

    /// Article counts grouped by status. Statuses with no articles are absent.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM articles GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Authors with the most articles, highest count first.
    pub async fn top_authors(pool: &PgPool, limit: i64) -> Result<Vec<AuthorCount>, sqlx::Error> {
        sqlx::query_as::<_, AuthorCount>(
            "SELECT a.author_id, u.name AS author_name, COUNT(*) AS count
             FROM articles a
             JOIN users u ON u.id = a.author_id
             GROUP BY a.author_id, u.name
             ORDER BY count DESC, u.name
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

/// `ILIKE` pattern matching `text` anywhere, with wildcards in `text` escaped.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
