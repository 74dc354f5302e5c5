//! Progress-record workflow: policy-screened draft saves, derived-field
//! recomputation, quarterly warnings, and the submit transition.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use promis_core::error::CoreError;
use promis_core::lifecycle::{check_transition, ProgressStatus};
use promis_core::policy::screen_payload;
use promis_core::quarterly::validate_quarterly_targets;
use promis_core::roles::Role;
use promis_core::types::DbId;
use promis_core::{calc, currency, validation, visibility};
use promis_db::models::progress::{
    CreateProgressRecord, ProgressFilter, ProgressRecord, UpdateProgressRecord,
};
use promis_db::repositories::progress_repo::ProgressRepo;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::{convert_money_fields, DisplayQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequirePhysicalStaff, RequireRegistrar};
use crate::resolution::{resolve_progress, resolve_project, ResolvedProgress};
use crate::state::AppState;
use crate::uploads::{parse_multipart, persist_uploads, ParsedUpload, PendingFile};

/// Monetary progress fields rendered in the display currency. Percentages
/// are never converted.
const MONEY_FIELDS: &[&str] = &[
    "total_cost_original",
    "total_cost_current",
    "awarded_amount",
    "allocation_current_year",
    "expenditure_target",
    "imprest_requested",
    "imprest_received",
    "actual_expenditure",
    "bills_in_hand",
    "price_escalation",
    "cumulative_expenditure_at_year_end",
];

/// Percentage fields validated into [0, 100] before any write.
const PERCENTAGE_FIELDS: &[&str] = &[
    "progress_as_of_prev_dec_percentage",
    "quarter1_target_percentage",
    "quarter2_target_percentage",
    "quarter3_target_percentage",
    "quarter4_target_percentage",
    "year_end_progress_percentage",
];

/// A saved record plus non-fatal data-quality warnings.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub record: ProgressRecord,
    pub warnings: Vec<String>,
}

fn record_view(record: &ProgressRecord, rate: f64) -> Value {
    let mut value = serde_json::to_value(record).unwrap_or(Value::Null);
    convert_money_fields(&mut value, MONEY_FIELDS, rate);
    value
}

/// The effective edit-mode flag for a role. Financial staff edits are
/// additionally frozen while a non-native display currency is active, so a
/// converted figure can never be written back as if it were LKR.
fn editing_flag(role: Role, display: &DisplayQuery) -> bool {
    role != Role::FinancialStaff || currency::is_native(display.currency())
}

fn validate_percentages(fields: &Map<String, Value>) -> AppResult<()> {
    for name in PERCENTAGE_FIELDS {
        if let Some(v) = fields.get(*name).and_then(Value::as_f64) {
            validation::validate_percentage(name, v)?;
        }
    }
    Ok(())
}

/// GET /progress?status=&project_id=
pub async fn list_progress(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(display): Query<DisplayQuery>,
    Query(filter): Query<ProgressFilter>,
) -> AppResult<Json<Vec<Value>>> {
    let rate = display.rate()?;
    if let Some(status) = filter.status.as_deref() {
        if ProgressStatus::parse(status).is_none() {
            return Err(CoreError::Validation(format!("Unknown status '{status}'")).into());
        }
    }
    let records = ProgressRepo::list(&state.pool, &filter).await?;
    Ok(Json(records.iter().map(|r| record_view(r, rate)).collect()))
}

/// GET /progress/{reference} -- dual-purpose resolution: a record by id, or
/// a project's records by project id / name.
pub async fn get_progress(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(reference): Path<String>,
    Query(display): Query<DisplayQuery>,
) -> AppResult<Json<Value>> {
    let rate = display.rate()?;
    match resolve_progress(&state.pool, &reference).await? {
        ResolvedProgress::One(record) => Ok(Json(record_view(&record, rate))),
        ResolvedProgress::Many(records) => Ok(Json(Value::Array(
            records.iter().map(|r| record_view(r, rate)).collect(),
        ))),
    }
}

/// POST /progress -- create a draft (multipart with optional images).
pub async fn create_progress(
    State(state): State<AppState>,
    RequirePhysicalStaff(user): RequirePhysicalStaff,
    Query(display): Query<DisplayQuery>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProgressResponse>)> {
    let ParsedUpload { mut fields, pending } = parse_multipart(multipart).await?;
    // Creation always starts as a draft; the submit transition is separate.
    fields.remove("status");

    let report = screen_payload(user.role, editing_flag(user.role, &display), &mut fields);
    if report.all_rejected() {
        return Err(CoreError::Forbidden(
            "None of the submitted fields are editable by your role".into(),
        )
        .into());
    }

    let reference = match fields.remove("project_id") {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(CoreError::Validation(
                "A progress record requires a project_id reference".into(),
            )
            .into())
        }
    };
    // At creation an unresolvable reference is a payload problem, not a
    // lookup miss: the client named a project that does not exist.
    let project = match resolve_project(&state.pool, &reference).await {
        Ok(project) => project,
        Err(AppError::Core(CoreError::NotFound { .. } | CoreError::NotFoundNamed { .. })) => {
            return Err(CoreError::Validation(format!(
                "project_id '{reference}' does not match any project"
            ))
            .into());
        }
        Err(other) => return Err(other),
    };
    if !visibility::can_view_project(
        &user.viewer(),
        project.created_by,
        project.institution.as_deref(),
    ) {
        return Err(CoreError::Forbidden("You may not report on this project".into()).into());
    }

    validate_percentages(&fields)?;
    let input: CreateProgressRecord = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| CoreError::Validation(format!("Invalid progress payload: {e}")))?;
    persist_uploads(&pending, &fields, &state.config.upload_dir).await?;

    let cumulative = derive_cumulative(
        input.progress_as_of_prev_dec_percentage,
        input.year_end_progress_percentage,
    );
    let warnings = validate_quarterly_targets(
        input.quarter1_target_percentage,
        input.quarter2_target_percentage,
        input.quarter3_target_percentage,
        input.quarter4_target_percentage,
    );

    let record = ProgressRepo::create(&state.pool, project.id, &input, cumulative).await?;
    tracing::info!(
        progress_id = record.id,
        project_id = project.id,
        user_id = user.user_id,
        "progress record created"
    );
    Ok((StatusCode::CREATED, Json(ProgressResponse { record, warnings })))
}

/// PUT /progress/{id} -- JSON draft save.
pub async fn update_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(display): Query<DisplayQuery>,
    Json(payload): Json<Value>,
) -> AppResult<Json<ProgressResponse>> {
    let Value::Object(fields) = payload else {
        return Err(CoreError::Validation("Expected a JSON object".into()).into());
    };
    apply_update(&state, &user, id, &display, fields, &[]).await
}

/// PATCH /progress/{id} -- multipart draft save (image updates).
pub async fn patch_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(display): Query<DisplayQuery>,
    multipart: Multipart,
) -> AppResult<Json<ProgressResponse>> {
    let ParsedUpload { fields, pending } = parse_multipart(multipart).await?;
    apply_update(&state, &user, id, &display, fields, &pending).await
}

/// Shared body of PUT/PATCH: screen, validate the status transition, merge,
/// recompute the derived percentage, and persist.
async fn apply_update(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    display: &DisplayQuery,
    mut fields: Map<String, Value>,
    pending: &[PendingFile],
) -> AppResult<Json<ProgressResponse>> {
    let existing = ProgressRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "progress record",
            id,
        })?;

    // project_id is fixed at creation; a reparent is never a draft save.
    fields.remove("project_id");

    let current_status = ProgressStatus::parse(&existing.status).ok_or_else(|| {
        CoreError::Internal(format!("Record {id} carries unknown status '{}'", existing.status))
    })?;
    if let Some(requested) = fields.get("status").and_then(Value::as_str) {
        let desired = ProgressStatus::parse(requested)
            .ok_or_else(|| CoreError::Validation(format!("Unknown status '{requested}'")))?;
        check_transition(
            user.role,
            current_status,
            desired,
            state.config.allow_submission_revert,
        )?;
    }

    let report = screen_payload(user.role, editing_flag(user.role, display), &mut fields);
    if report.all_rejected() {
        return Err(CoreError::Forbidden(
            "None of the submitted fields are editable by your role".into(),
        )
        .into());
    }

    validate_percentages(&fields)?;
    let input: UpdateProgressRecord = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| CoreError::Validation(format!("Invalid progress payload: {e}")))?;
    persist_uploads(pending, &fields, &state.config.upload_dir).await?;

    // Merge against the stored row so the derived value and warnings see the
    // full post-save state, not just the delta.
    let prev = input
        .progress_as_of_prev_dec_percentage
        .or(existing.progress_as_of_prev_dec_percentage);
    let year_end = input
        .year_end_progress_percentage
        .or(existing.year_end_progress_percentage);
    let cumulative = derive_cumulative(prev, year_end);
    let warnings = validate_quarterly_targets(
        input
            .quarter1_target_percentage
            .or(existing.quarter1_target_percentage),
        input
            .quarter2_target_percentage
            .or(existing.quarter2_target_percentage),
        input
            .quarter3_target_percentage
            .or(existing.quarter3_target_percentage),
        input
            .quarter4_target_percentage
            .or(existing.quarter4_target_percentage),
    );

    let record = ProgressRepo::update(&state.pool, id, &input, cumulative)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "progress record",
            id,
        })?;
    tracing::info!(progress_id = id, user_id = user.user_id, "progress record saved");
    Ok(Json(ProgressResponse { record, warnings }))
}

/// POST /progress/{id}/submit -- registrar or admin, draft -> submitted.
pub async fn submit_progress(
    State(state): State<AppState>,
    RequireRegistrar(user): RequireRegistrar,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProgressRecord>> {
    let existing = ProgressRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "progress record",
            id,
        })?;
    let current = ProgressStatus::parse(&existing.status).ok_or_else(|| {
        CoreError::Internal(format!("Record {id} carries unknown status '{}'", existing.status))
    })?;
    check_transition(
        user.role,
        current,
        ProgressStatus::Submitted,
        state.config.allow_submission_revert,
    )?;

    let record = ProgressRepo::set_status(&state.pool, id, ProgressStatus::Submitted.as_str())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "progress record",
            id,
        })?;
    tracing::info!(progress_id = id, user_id = user.user_id, "progress record submitted");
    Ok(Json(record))
}

/// DELETE /progress/{id} -- physical staff or admin.
pub async fn delete_progress(
    State(state): State<AppState>,
    RequirePhysicalStaff(user): RequirePhysicalStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ProgressRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "progress record",
            id,
        }
        .into());
    }
    tracing::info!(progress_id = id, user_id = user.user_id, "progress record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute the derived percentage when either input is present.
fn derive_cumulative(prev: Option<f64>, year_end: Option<f64>) -> Option<f64> {
    if prev.is_none() && year_end.is_none() {
        return None;
    }
    Some(calc::cumulative_progress_percentage(
        prev.unwrap_or(0.0),
        year_end.unwrap_or(0.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_flag_guards_financial_currency() {
        let native = DisplayQuery::default();
        let usd = DisplayQuery {
            display_currency: Some("USD".into()),
        };
        assert!(editing_flag(Role::FinancialStaff, &native));
        assert!(!editing_flag(Role::FinancialStaff, &usd));
        // Only the financial role is currency-gated.
        assert!(editing_flag(Role::PhysicalStaff, &usd));
    }

    #[test]
    fn test_derive_cumulative_skips_untouched_inputs() {
        assert_eq!(derive_cumulative(None, None), None);
        assert_eq!(derive_cumulative(Some(60.0), Some(50.0)), Some(80.0));
        // One-sided input still derives, treating the other side as zero.
        assert_eq!(derive_cumulative(Some(30.0), None), Some(30.0));
    }

    #[test]
    fn test_percentage_validation_rejects_out_of_range() {
        let fields = serde_json::json!({"year_end_progress_percentage": 120.0})
            .as_object()
            .cloned()
            .unwrap();
        assert!(validate_percentages(&fields).is_err());
    }
}
