//! User management: self-service profile plus admin CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use promis_core::error::CoreError;
use promis_core::roles::Role;
use promis_core::types::DbId;
use promis_core::validation;
use promis_db::models::user::{UpdateUser, UserResponse};
use promis_db::repositories::user_repo::UserRepo;
use serde::Deserialize;

use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Self-service profile update. Role and institution are admin-controlled
/// and deliberately absent here.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Admin update of any account, including role and institution.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub institution_id: Option<String>,
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        })?;
    Ok(Json(row.into()))
}

/// PUT /users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let input = build_update(req.username, req.email, req.password, None, None)?;
    let updated = UserRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        })?;
    Ok(Json(updated.into()))
}

/// PUT /users/{id} (admin)
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(req): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let role = match req.role.as_deref() {
        Some(r) => Some(validation::validate_role(r)?),
        None => None,
    };

    // Demoting the last admin would leave the system unmanageable, the same
    // invariant the deletion guard protects.
    if let Some(new_role) = role {
        if new_role != Role::Admin {
            let target = UserRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(CoreError::NotFound { entity: "user", id })?;
            if target.role == Role::Admin.as_str() && UserRepo::count_admins(&state.pool).await? <= 1
            {
                return Err(
                    CoreError::Conflict("Cannot demote the last admin account".into()).into(),
                );
            }
        }
    }

    let input = build_update(
        req.username,
        req.email,
        req.password,
        role.map(|r| r.as_str().to_string()),
        req.institution_id,
    )?;
    let updated = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;
    tracing::info!(user_id = id, "user updated by admin");
    Ok(Json(updated.into()))
}

/// DELETE /users/{id} (admin; last-admin guard)
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;

    if target.role == Role::Admin.as_str() && UserRepo::count_admins(&state.pool).await? <= 1 {
        return Err(CoreError::Conflict("Cannot delete the last admin account".into()).into());
    }

    UserRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Validate and assemble an [`UpdateUser`], hashing the password if present.
fn build_update(
    username: Option<String>,
    email: Option<String>,
    plaintext_password: Option<String>,
    role: Option<String>,
    institution_id: Option<String>,
) -> AppResult<UpdateUser> {
    if let Some(email) = email.as_deref() {
        validation::validate_email(email)?;
    }
    let password_hash = match plaintext_password.as_deref() {
        Some(pw) => {
            validation::validate_password(pw)?;
            Some(
                password::hash_password(pw)
                    .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?,
            )
        }
        None => None,
    };
    Ok(UpdateUser {
        username,
        email: email.map(|e| e.to_lowercase()),
        password_hash,
        role,
        institution_id,
    })
}
