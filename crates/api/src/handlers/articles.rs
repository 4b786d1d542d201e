//! Handlers for the `/articles` resource: CRUD, search, stats, and the
//! review workflow.
//!
//! Workflow handlers share one shape: role gate (403), request body (400),
//! load the article (404), ask [`workflow::plan`] for the ownership (403)
//! and status (400) decision, then write the decided columns in a single
//! statement. The role gate comes first so callers without the role learn
//! nothing about which ids exist.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use newsdesk_core::access::{authorize, can_view, VisibilityScope};
use newsdesk_core::article::{
    normalize_rejection_comment, normalize_search_query, normalize_title, validate_content,
    ArticleOperation, ArticleStatus, SEARCH_RESULT_LIMIT, VALID_STATUSES,
};
use newsdesk_core::error::CoreError;
use newsdesk_core::sanitize::sanitize_content;
use newsdesk_core::types::DbId;
use newsdesk_core::workflow::{self, Assignee, Command, Plan, ReviewChange};
use newsdesk_db::models::article::{
    Article, ArticleDetail, ArticleFilter, AuthorCount, CreateArticle, UpdateArticle,
};
use newsdesk_db::repositories::{ArticleRepo, UserRepo};
use newsdesk_db::DbPool;
use newsdesk_events::ReviewEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{ArticleListParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of authors listed in the newsroom stats.
const TOP_AUTHORS_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /articles`.
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Request body for `PUT /articles/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Request body for `PUT /articles/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(alias = "editorId")]
    pub editor_id: Option<DbId>,
}

/// Request body for `PUT /articles/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub comment: Option<String>,
}

/// Response body for `GET /articles/stats`.
#[derive(Debug, Serialize)]
pub struct ArticleStats {
    pub total: i64,
    /// Every status is present, zero when empty.
    pub by_status: BTreeMap<&'static str, i64>,
    pub top_authors: Vec<AuthorCount>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Article",
        id,
    })
}

async fn load_article(pool: &DbPool, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn load_detail(pool: &DbPool, id: DbId) -> AppResult<ArticleDetail> {
    ArticleRepo::find_detail(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Unwrap the review change from a plan produced by a review command.
fn review_change(plan: Plan) -> AppResult<ReviewChange> {
    match plan {
        Plan::Review(change) => Ok(change),
        other => Err(AppError::InternalError(format!(
            "Unexpected workflow plan: {other:?}"
        ))),
    }
}

/// Write a review change and return the updated row.
async fn apply_review(pool: &DbPool, id: DbId, change: &ReviewChange) -> AppResult<Article> {
    ArticleRepo::apply_review(pool, id, change)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Sanitize a body and check the length of the text left in the cleaned markup.
fn clean_content(raw: &str) -> AppResult<String> {
    let cleaned = sanitize_content(raw);
    validate_content(&cleaned)?;
    Ok(cleaned)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/articles
///
/// Create a draft owned by the caller. Writers only.
pub async fn create_article(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateArticleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ArticleDetail>>)> {
    workflow::start(&user.actor())?;

    let title = normalize_title(&input.title)?;
    let content = clean_content(&input.content)?;

    let article = ArticleRepo::create(
        &state.pool,
        &CreateArticle {
            title,
            content,
            author_id: user.user_id,
        },
    )
    .await?;

    tracing::info!(article_id = article.id, user_id = user.user_id, "Article created");

    let detail = load_detail(&state.pool, article.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/articles
///
/// List articles visible to the caller, newest first. Filters narrow the
/// caller's scope and never widen it.
pub async fn list_articles(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Query(params): Query<ArticleListParams>,
) -> AppResult<Json<DataResponse<Vec<ArticleDetail>>>> {
    let actor = caller.actor();
    let scope = VisibilityScope::for_actor(actor.as_ref());

    let mut filter = ArticleFilter::new(scope);
    if scope.allows_status_filter() {
        filter.status = params
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<ArticleStatus>)
            .transpose()?;
    }
    filter.author_id = params.author;
    filter.editor_id = params.editor;
    filter.search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let articles = ArticleRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/articles/search?q=
///
/// Public title search over approved articles.
pub async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<ArticleDetail>>>> {
    let q = normalize_search_query(params.q.as_deref())?;
    let articles = ArticleRepo::search_approved(&state.pool, &q, SEARCH_RESULT_LIMIT).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/articles/stats
pub async fn article_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<ArticleStats>>> {
    let total = ArticleRepo::count(&state.pool).await?;

    let mut by_status: BTreeMap<&'static str, i64> =
        VALID_STATUSES.iter().map(|s| (*s, 0)).collect();
    for row in ArticleRepo::count_by_status(&state.pool).await? {
        by_status.insert(row.status.as_str(), row.count);
    }

    let top_authors = ArticleRepo::top_authors(&state.pool, TOP_AUTHORS_LIMIT).await?;

    Ok(Json(DataResponse {
        data: ArticleStats {
            total,
            by_status,
            top_authors,
        },
    }))
}

/// GET /api/v1/articles/{id}
///
/// Approved articles are public; anything else is visible to its author,
/// its assigned editor, and admins.
pub async fn get_article(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArticleDetail>>> {
    let detail = load_detail(&state.pool, id).await?;
    let article = &detail.article;

    if !can_view(
        caller.actor().as_ref(),
        article.status,
        article.author_id,
        article.assigned_editor_id,
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to view this article".into(),
        )));
    }

    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/articles/{id}
///
/// Edit title and/or content of a draft or rejected article. Author only.
pub async fn update_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArticleRequest>,
) -> AppResult<Json<DataResponse<ArticleDetail>>> {
    authorize(&user.actor(), ArticleOperation::Update)?;

    let changes = UpdateArticle {
        title: input.title.as_deref().map(normalize_title).transpose()?,
        content: input.content.as_deref().map(clean_content).transpose()?,
    };

    let article = load_article(&state.pool, id).await?;
    workflow::plan(&article.snapshot(), &user.actor(), Command::Update, Utc::now())?;

    ArticleRepo::update_content(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(article_id = id, user_id = user.user_id, "Article updated");

    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/articles/{id}
///
/// Authors may delete their own drafts; admins may delete anything.
pub async fn delete_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize(&user.actor(), ArticleOperation::Delete)?;

    let article = load_article(&state.pool, id).await?;
    let plan = workflow::plan(&article.snapshot(), &user.actor(), Command::Delete, Utc::now())?;
    if plan != Plan::Remove {
        return Err(AppError::InternalError(format!(
            "Unexpected workflow plan: {plan:?}"
        )));
    }

    if !ArticleRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(
        article_id = id,
        user_id = user.user_id,
        status = %article.status,
        "Article deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// PUT /api/v1/articles/{id}/submit
///
/// Send a draft or rejected article to an active editor for review.
pub async fn submit_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<Json<DataResponse<ArticleDetail>>> {
    authorize(&user.actor(), ArticleOperation::Submit)?;

    let editor_id = input
        .editor_id
        .ok_or_else(|| AppError::Core(CoreError::Validation("Editor is required".into())))?;

    let assignee = UserRepo::find_by_id(&state.pool, editor_id)
        .await?
        .map(|u| Assignee {
            role: u.role,
            is_active: u.is_active,
        });
    workflow::validate_assignee(assignee)?;

    let article = load_article(&state.pool, id).await?;
    let plan = workflow::plan(
        &article.snapshot(),
        &user.actor(),
        Command::Submit { editor_id },
        Utc::now(),
    )?;
    apply_review(&state.pool, id, &review_change(plan)?).await?;

    tracing::info!(article_id = id, user_id = user.user_id, editor_id, "Article submitted");

    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/articles/{id}/approve
///
/// Publish a submitted article. Assigned editor only. Notifies the author.
pub async fn approve_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArticleDetail>>> {
    authorize(&user.actor(), ArticleOperation::Approve)?;

    let article = load_article(&state.pool, id).await?;
    let plan = workflow::plan(&article.snapshot(), &user.actor(), Command::Approve, Utc::now())?;
    let updated = apply_review(&state.pool, id, &review_change(plan)?).await?;

    tracing::info!(article_id = id, user_id = user.user_id, "Article approved");

    state.event_bus.publish(
        ReviewEvent::approved(updated.id, updated.title.clone(), updated.author_id)
            .with_actor(user.user_id, user.name.clone()),
    );

    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/articles/{id}/reject
///
/// Return a submitted article to its author with a comment. Assigned editor
/// only. Notifies the author.
pub async fn reject_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<ArticleDetail>>> {
    authorize(&user.actor(), ArticleOperation::Reject)?;

    let comment = normalize_rejection_comment(input.comment.as_deref())?;

    let article = load_article(&state.pool, id).await?;
    let plan = workflow::plan(
        &article.snapshot(),
        &user.actor(),
        Command::Reject {
            comment: comment.clone(),
        },
        Utc::now(),
    )?;
    let updated = apply_review(&state.pool, id, &review_change(plan)?).await?;

    tracing::info!(article_id = id, user_id = user.user_id, "Article rejected");

    state.event_bus.publish(
        ReviewEvent::rejected(updated.id, updated.title.clone(), updated.author_id, comment)
            .with_actor(user.user_id, user.name.clone()),
    );

    let detail = load_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}
