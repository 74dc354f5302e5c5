//! Project CRUD with institution-scoped visibility.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use promis_core::error::CoreError;
use promis_core::types::DbId;
use promis_core::visibility;
use promis_db::models::project::{CreateProject, Project, UpdateProject};
use promis_db::repositories::project_repo::ProjectRepo;
use serde_json::Value;

use crate::error::AppResult;
use crate::handlers::{convert_money_fields, DisplayQuery};
use crate::middleware::auth::AuthUser;
use crate::resolution::resolve_project;
use crate::state::AppState;
use crate::uploads::{parse_multipart, persist_uploads, ParsedUpload};

/// Monetary project fields rendered in the display currency.
const MONEY_FIELDS: &[&str] = &["tec", "awarded_amount"];

fn project_view(project: &Project, rate: f64) -> Value {
    let mut value = serde_json::to_value(project).unwrap_or(Value::Null);
    convert_money_fields(&mut value, MONEY_FIELDS, rate);
    value
}

/// GET /projects -- admin sees all, others see own plus institution peers'.
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
    Query(display): Query<DisplayQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let rate = display.rate()?;
    let projects = if user.viewer().is_admin() {
        ProjectRepo::list_all(&state.pool).await?
    } else {
        ProjectRepo::list_visible(&state.pool, user.user_id, user.institution_id.as_deref())
            .await?
    };
    Ok(Json(projects.iter().map(|p| project_view(p, rate)).collect()))
}

/// POST /projects -- multipart fields plus optional attachments.
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Project>)> {
    let ParsedUpload { fields, pending } = parse_multipart(multipart).await?;
    let input: CreateProject = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| CoreError::Validation(format!("Invalid project payload: {e}")))?;
    persist_uploads(&pending, &fields, &state.config.upload_dir).await?;

    let project = ProjectRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(project_id = project.id, created_by = user.user_id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /projects/{reference} -- id or exact name; 403 when not visible.
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(reference): Path<String>,
    Query(display): Query<DisplayQuery>,
) -> AppResult<Json<Value>> {
    let rate = display.rate()?;
    let project = resolve_project(&state.pool, &reference).await?;
    if !visibility::can_view_project(
        &user.viewer(),
        project.created_by,
        project.institution.as_deref(),
    ) {
        return Err(CoreError::Forbidden("You may not view this project".into()).into());
    }
    Ok(Json(project_view(&project, rate)))
}

/// PUT /projects/{id} -- owner or admin; multipart like create.
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Project>> {
    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;
    if !visibility::can_mutate_project(&user.viewer(), existing.created_by) {
        return Err(CoreError::Forbidden("Only the creator or an admin may edit this project".into()).into());
    }

    let ParsedUpload { fields, pending } = parse_multipart(multipart).await?;
    let input: UpdateProject = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| CoreError::Validation(format!("Invalid project payload: {e}")))?;
    persist_uploads(&pending, &fields, &state.config.upload_dir).await?;

    let updated = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;
    tracing::info!(project_id = id, user_id = user.user_id, "project updated");
    Ok(Json(updated))
}

/// DELETE /projects/{id} -- owner or admin; progress records cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })?;
    if !visibility::can_mutate_project(&user.viewer(), existing.created_by) {
        return Err(
            CoreError::Forbidden("Only the creator or an admin may delete this project".into())
                .into(),
        );
    }

    ProjectRepo::delete(&state.pool, id).await?;
    tracing::info!(project_id = id, user_id = user.user_id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
