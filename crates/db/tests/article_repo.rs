//! Integration tests for `ArticleRepo`: CRUD, review updates, and the
//! visibility-scoped listing.

use chrono::Utc;
use newsdesk_core::access::VisibilityScope;
use newsdesk_core::article::ArticleStatus;
use newsdesk_core::roles::Role;
use newsdesk_core::types::DbId;
use newsdesk_core::workflow::ReviewChange;
use newsdesk_db::models::article::{ArticleFilter, CreateArticle, UpdateArticle};
use newsdesk_db::models::user::CreateUser;
use newsdesk_db::repositories::{ArticleRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BODY: &str = "<p>The council voted on Tuesday to expand the riverside park.</p>";

async fn user(pool: &PgPool, name: &str, role: Role) -> DbId {
    let input = CreateUser {
        name: name.to_string(),
        email: format!("{}@news.io", name.to_lowercase()),
        password_hash: "$argon2id$stub".to_string(),
        role,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn draft(pool: &PgPool, author_id: DbId, title: &str) -> DbId {
    let input = CreateArticle {
        title: title.to_string(),
        content: BODY.to_string(),
        author_id,
    };
    ArticleRepo::create(pool, &input).await.unwrap().id
}

fn submitted(editor_id: DbId) -> ReviewChange {
    ReviewChange {
        status: ArticleStatus::Submitted,
        assigned_editor_id: Some(editor_id),
        approved_by_id: None,
        rejection_comment: String::new(),
        submitted_at: Some(Utc::now()),
        reviewed_at: None,
    }
}

fn approved(editor_id: DbId) -> ReviewChange {
    ReviewChange {
        status: ArticleStatus::Approved,
        assigned_editor_id: None,
        approved_by_id: Some(editor_id),
        rejection_comment: String::new(),
        submitted_at: None,
        reviewed_at: Some(Utc::now()),
    }
}

fn rejected(comment: &str) -> ReviewChange {
    ReviewChange {
        status: ArticleStatus::Rejected,
        assigned_editor_id: None,
        approved_by_id: None,
        rejection_comment: comment.to_string(),
        submitted_at: None,
        reviewed_at: Some(Utc::now()),
    }
}

async fn titles(pool: &PgPool, filter: &ArticleFilter) -> Vec<String> {
    ArticleRepo::list(pool, filter)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.article.title)
        .collect()
}

// ---------------------------------------------------------------------------
// CRUD and review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_starts_as_draft(pool: PgPool) {
    let author = user(&pool, "Wendy", Role::Writer).await;
    let id = draft(&pool, author, "Park expansion").await;

    let article = ArticleRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(article.status, ArticleStatus::Draft);
    assert_eq!(article.author_id, author);
    assert!(article.assigned_editor_id.is_none());
    assert!(article.rejection_comment.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_detail_joins_people(pool: PgPool) {
    let author = user(&pool, "Wendy", Role::Writer).await;
    let editor = user(&pool, "Eddie", Role::Editor).await;
    let id = draft(&pool, author, "Park expansion").await;

    let detail = ArticleRepo::find_detail(&pool, id).await.unwrap().unwrap();
    assert_eq!(detail.author_name, "Wendy");
    assert!(detail.assigned_editor_name.is_none());

    ArticleRepo::apply_review(&pool, id, &submitted(editor)).await.unwrap();
    ArticleRepo::apply_review(&pool, id, &approved(editor)).await.unwrap();

    let detail = ArticleRepo::find_detail(&pool, id).await.unwrap().unwrap();
    assert_eq!(detail.assigned_editor_name.as_deref(), Some("Eddie"));
    assert_eq!(detail.approved_by_email.as_deref(), Some("eddie@news.io"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_content_keeps_missing_fields(pool: PgPool) {
    let author = user(&pool, "Wendy", Role::Writer).await;
    let id = draft(&pool, author, "Park expansion").await;

    let updated = ArticleRepo::update_content(
        &pool,
        id,
        &UpdateArticle {
            title: Some("Park expansion approved".to_string()),
            content: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Park expansion approved");
    assert_eq!(updated.content, BODY);

    assert!(ArticleRepo::update_content(&pool, 999_999, &UpdateArticle::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resubmit_clears_rejection_comment(pool: PgPool) {
    let author = user(&pool, "Wendy", Role::Writer).await;
    let editor = user(&pool, "Eddie", Role::Editor).await;
    let id = draft(&pool, author, "Park expansion").await;

    let first = ArticleRepo::apply_review(&pool, id, &submitted(editor))
        .await
        .unwrap()
        .unwrap();
    let first_submitted_at = first.submitted_at.unwrap();

    let after_reject = ArticleRepo::apply_review(&pool, id, &rejected("Needs more sources"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after_reject.status, ArticleStatus::Rejected);
    assert_eq!(after_reject.rejection_comment, "Needs more sources");
    assert_eq!(after_reject.assigned_editor_id, Some(editor));
    assert_eq!(after_reject.submitted_at, Some(first_submitted_at));

    let resubmitted = ArticleRepo::apply_review(&pool, id, &submitted(editor))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resubmitted.status, ArticleStatus::Submitted);
    assert!(resubmitted.rejection_comment.is_empty());
    assert!(resubmitted.reviewed_at.is_some(), "reviewed_at is kept");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete(pool: PgPool) {
    let author = user(&pool, "Wendy", Role::Writer).await;
    let id = draft(&pool, author, "Park expansion").await;

    assert!(ArticleRepo::delete(&pool, id).await.unwrap());
    assert!(!ArticleRepo::delete(&pool, id).await.unwrap());
    assert!(ArticleRepo::find_by_id(&pool, id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Listing and search
// ---------------------------------------------------------------------------

/// Two writers, two editors; one article in each state.
struct Newsroom {
    wendy: DbId,
    walt: DbId,
    eddie: DbId,
    erin: DbId,
}

async fn newsroom(pool: &PgPool) -> Newsroom {
    let wendy = user(pool, "Wendy", Role::Writer).await;
    let walt = user(pool, "Walt", Role::Writer).await;
    let eddie = user(pool, "Eddie", Role::Editor).await;
    let erin = user(pool, "Erin", Role::Editor).await;

    draft(pool, wendy, "Wendy draft").await;

    let s = draft(pool, wendy, "Wendy submitted").await;
    ArticleRepo::apply_review(pool, s, &submitted(eddie)).await.unwrap();

    let a = draft(pool, walt, "Walt approved").await;
    ArticleRepo::apply_review(pool, a, &submitted(erin)).await.unwrap();
    ArticleRepo::apply_review(pool, a, &approved(erin)).await.unwrap();

    let r = draft(pool, walt, "Walt rejected").await;
    ArticleRepo::apply_review(pool, r, &submitted(eddie)).await.unwrap();
    ArticleRepo::apply_review(pool, r, &rejected("Needs more sources")).await.unwrap();

    Newsroom {
        wendy,
        walt,
        eddie,
        erin,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scopes(pool: PgPool) {
    let n = newsroom(&pool).await;

    let public = titles(&pool, &ArticleFilter::new(VisibilityScope::ApprovedOnly)).await;
    assert_eq!(public, ["Walt approved"]);

    let wendy = titles(&pool, &ArticleFilter::new(VisibilityScope::AuthoredBy(n.wendy))).await;
    assert_eq!(wendy, ["Wendy submitted", "Wendy draft"]);

    let eddie = titles(&pool, &ArticleFilter::new(VisibilityScope::ReviewedBy(n.eddie))).await;
    assert_eq!(eddie, ["Walt rejected", "Wendy submitted"]);

    let erin = titles(&pool, &ArticleFilter::new(VisibilityScope::ReviewedBy(n.erin))).await;
    assert_eq!(erin, ["Walt approved"]);

    let all = titles(&pool, &ArticleFilter::new(VisibilityScope::Everything)).await;
    assert_eq!(all.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approved_only_ignores_status_filter(pool: PgPool) {
    newsroom(&pool).await;

    let mut filter = ArticleFilter::new(VisibilityScope::ApprovedOnly);
    filter.status = Some(ArticleStatus::Draft);
    assert_eq!(titles(&pool, &filter).await, ["Walt approved"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_filter_cannot_widen_writer_scope(pool: PgPool) {
    let n = newsroom(&pool).await;

    let mut filter = ArticleFilter::new(VisibilityScope::AuthoredBy(n.wendy));
    filter.author_id = Some(n.walt);
    assert!(titles(&pool, &filter).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filters_narrow_editor_scope(pool: PgPool) {
    let n = newsroom(&pool).await;

    let mut filter = ArticleFilter::new(VisibilityScope::ReviewedBy(n.eddie));
    filter.status = Some(ArticleStatus::Submitted);
    assert_eq!(titles(&pool, &filter).await, ["Wendy submitted"]);

    let mut filter = ArticleFilter::new(VisibilityScope::ReviewedBy(n.eddie));
    filter.search = Some("WALT".to_string());
    assert_eq!(titles(&pool, &filter).await, ["Walt rejected"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_filters(pool: PgPool) {
    let n = newsroom(&pool).await;

    let mut filter = ArticleFilter::new(VisibilityScope::Everything);
    filter.editor_id = Some(n.eddie);
    filter.author_id = Some(n.walt);
    assert_eq!(titles(&pool, &filter).await, ["Walt rejected"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_approved(pool: PgPool) {
    newsroom(&pool).await;

    let hits = ArticleRepo::search_approved(&pool, "walt", 20).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].article.status, ArticleStatus::Approved);

    let wildcard = ArticleRepo::search_approved(&pool, "%", 20).await.unwrap();
    assert!(wildcard.is_empty(), "wildcards are matched literally");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats(pool: PgPool) {
    let n = newsroom(&pool).await;

    assert_eq!(ArticleRepo::count(&pool).await.unwrap(), 4);

    let by_status = ArticleRepo::count_by_status(&pool).await.unwrap();
    assert_eq!(by_status.len(), 4);
    assert!(by_status.iter().all(|c| c.count == 1));

    let top = ArticleRepo::top_authors(&pool, 5).await.unwrap();
    assert_eq!(top.len(), 2);
    // Tied at two each; ties break by name.
    assert_eq!(top[0].author_id, n.walt);
    assert_eq!(top[0].count, 2);
}
