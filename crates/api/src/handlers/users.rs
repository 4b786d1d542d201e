//! Handlers for the `/users` resource (newsroom staff management).

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use newsdesk_core::error::CoreError;
use newsdesk_core::roles::{Role, VALID_ROLES};
use newsdesk_core::types::DbId;
use newsdesk_db::models::user::{User, UserResponse, UserSummary};
use newsdesk_db::repositories::UserRepo;
use newsdesk_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireReviewer, RequireStaff};
use crate::query::UserListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// Response body for `GET /users/stats`.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    /// Every role is present, zero when empty.
    pub by_role: BTreeMap<&'static str, i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_user(pool: &DbPool, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users?role=&search=
///
/// An unknown `role` value is ignored rather than rejected.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let role = params.role.as_deref().and_then(|r| r.parse::<Role>().ok());
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let users = UserRepo::list(&state.pool, role, search).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/editors
///
/// Active editors, for the submit dialog.
pub async fn list_editors(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let editors = UserRepo::list_active_by_role(&state.pool, Role::Editor).await?;
    Ok(Json(DataResponse { data: editors }))
}

/// GET /api/v1/users/writers
pub async fn list_writers(
    State(state): State<AppState>,
    RequireReviewer(_user): RequireReviewer,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let writers = UserRepo::list_by_role(&state.pool, Role::Writer).await?;
    Ok(Json(DataResponse { data: writers }))
}

/// GET /api/v1/users/stats
pub async fn user_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<UserStats>>> {
    let (total, active) = UserRepo::count_active(&state.pool).await?;

    let mut by_role: BTreeMap<&'static str, i64> = VALID_ROLES.iter().map(|r| (*r, 0)).collect();
    for row in UserRepo::count_by_role(&state.pool).await? {
        by_role.insert(row.role.as_str(), row.count);
    }

    Ok(Json(DataResponse {
        data: UserStats {
            total,
            active,
            inactive: total - active,
            by_role,
        },
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/{id}/role
///
/// Move a user between `editor` and `writer`. Admin accounts and the
/// caller's own account cannot be changed.
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = input
        .role
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Role is required".into())))?;
    let role = role
        .parse::<Role>()
        .ok()
        .filter(|r| r.is_assignable())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Role must be either editor or writer".into(),
            ))
        })?;

    let target = load_user(&state.pool, id).await?;
    if target.role == Role::Admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot change admin role".into(),
        )));
    }
    if target.id == admin.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot change your own role".into(),
        )));
    }

    let updated = UserRepo::update_role(&state.pool, id, role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        user_id = id,
        admin_id = admin.user_id,
        from = %target.role,
        to = %role,
        "User role updated"
    );

    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}

/// PUT /api/v1/users/{id}/toggle-status
///
/// Flip `is_active`. Admin accounts and the caller's own account cannot be
/// deactivated.
pub async fn toggle_user_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let target = load_user(&state.pool, id).await?;
    if target.role == Role::Admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot deactivate admin account".into(),
        )));
    }
    if target.id == admin.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot deactivate your own account".into(),
        )));
    }

    let updated = UserRepo::set_active(&state.pool, id, !target.is_active)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        user_id = id,
        admin_id = admin.user_id,
        is_active = updated.is_active,
        "User status toggled"
    );

    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}
