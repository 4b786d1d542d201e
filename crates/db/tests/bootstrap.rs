//! Schema bootstrap: migrations apply cleanly and the review invariants are
//! enforced by the database itself.

use sqlx::PgPool;

/// Insert a user directly, bypassing the repository.
async fn seed_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ('Seed', $1, 'x', $2) RETURNING id",
    )
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    newsdesk_db::health_check(&pool).await.unwrap();

    for table in ["users", "articles"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_rejected(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role) VALUES ('X', 'x@x.io', 'x', 'owner')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "ck_users_role should reject 'owner'");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approved_requires_approver(pool: PgPool) {
    let author = seed_user(&pool, "w@news.io", "writer").await;

    let result = sqlx::query(
        "INSERT INTO articles (title, content, author_id, status)
         VALUES ('Headline', 'body', $1, 'approved')",
    )
    .bind(author)
    .execute(&pool)
    .await;
    assert!(result.is_err(), "approved article without approver must fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_requires_comment(pool: PgPool) {
    let author = seed_user(&pool, "w@news.io", "writer").await;

    let without_comment = sqlx::query(
        "INSERT INTO articles (title, content, author_id, status)
         VALUES ('Headline', 'body', $1, 'rejected')",
    )
    .bind(author)
    .execute(&pool)
    .await;
    assert!(without_comment.is_err());

    let comment_on_draft = sqlx::query(
        "INSERT INTO articles (title, content, author_id, rejection_comment)
         VALUES ('Headline', 'body', $1, 'stray comment')",
    )
    .bind(author)
    .execute(&pool)
    .await;
    assert!(comment_on_draft.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let id = seed_user(&pool, "w@news.io", "writer").await;
    let before: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    sqlx::query("UPDATE users SET name = 'Renamed' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let after: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT updated_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(after > before);
}
