//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use promis_core::error::CoreError;
use promis_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `physical_staff` or `admin`. Progress records are created by the
/// physical role group.
pub struct RequirePhysicalStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequirePhysicalStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::PhysicalStaff && user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Physical staff or Admin role required".into(),
            )));
        }
        Ok(RequirePhysicalStaff(user))
    }
}

/// Requires `registrar` or `admin`. Submission of progress records is a
/// registrar action.
pub struct RequireRegistrar(pub AuthUser);

impl FromRequestParts<AppState> for RequireRegistrar {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Registrar && user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Registrar or Admin role required".into(),
            )));
        }
        Ok(RequireRegistrar(user))
    }
}
