//! Startup creation of the bootstrap admin account.

use newsdesk_core::roles::Role;
use newsdesk_db::models::user::{CreateUser, User};
use newsdesk_db::repositories::UserRepo;
use newsdesk_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminSeed;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;

/// Create the seed admin unless an account with its email already exists.
///
/// Returns the new user, or `None` when nothing was created. An existing
/// account is left untouched even if it is not an admin.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> AppResult<Option<User>> {
    let email = normalize_email(&seed.email);

    if let Some(existing) = UserRepo::find_by_email(pool, &email).await? {
        if existing.role != Role::Admin {
            tracing::warn!(
                user_id = existing.id,
                role = %existing.role,
                "Seed admin email belongs to a non-admin account, skipping"
            );
        }
        return Ok(None);
    }

    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::BadRequest(format!("ADMIN_PASSWORD: {msg}")))?;

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: seed.name.trim().to_string(),
            email,
            password_hash,
            role: Role::Admin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Seed admin account created");
    Ok(Some(user))
}
