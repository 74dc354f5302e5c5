//! Registration, login, and refresh-token rotation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use promis_core::error::CoreError;
use promis_core::validation;
use promis_db::models::session::CreateSession;
use promis_db::models::user::{CreateUser, User, UserResponse};
use promis_db::repositories::session_repo::SessionRepo;
use promis_db::repositories::user_repo::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt;
use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub institution_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the safe user view, returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;
    let role = validation::validate_role(&req.role)?;

    if req.username.trim().is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()).into());
    }

    let password_hash = password::hash_password(&req.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: req.username.trim().to_string(),
            email: req.email.to_lowercase(),
            password_hash,
            role: role.as_str().to_string(),
            institution_id: req.institution_id,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &req.email.to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let ok = password::verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !ok {
        return Err(invalid());
    }

    let response = issue_tokens(&state, user).await?;
    tracing::info!(user_id = response.user.id, "login succeeded");
    Ok(Json(response))
}

/// POST /auth/refresh -- rotate the refresh token.
///
/// The presented token's session is revoked and a fresh pair is issued, so a
/// replayed refresh token is rejected on its second use.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let hash = jwt::hash_refresh_token(&req.refresh_token);
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    let response = issue_tokens(&state, user).await?;
    Ok(Json(response))
}

/// POST /auth/logout -- revoke every live session for the caller.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    tracing::info!(user_id = user.user_id, "logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Generate an access/refresh pair and persist the refresh session.
async fn issue_tokens(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = jwt::generate_access_token(
        user.id,
        &user.role,
        user.institution_id.as_deref(),
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_token, refresh_hash) = jwt::generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}
