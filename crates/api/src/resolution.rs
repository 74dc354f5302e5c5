//! Reference resolution for dual-purpose route parameters.
//!
//! Progress routes historically accept more than one kind of reference in
//! the same path position. A reference resolves in this order:
//!
//! 1. id-shaped (parses as `i64`) and matches a progress record id;
//! 2. id-shaped and matches a project id (yielding that project's records);
//! 3. not id-shaped, treated as an exact project name.

use promis_core::error::CoreError;
use promis_core::types::DbId;
use promis_db::models::progress::ProgressRecord;
use promis_db::models::project::Project;
use promis_db::repositories::progress_repo::ProgressRepo;
use promis_db::repositories::project_repo::ProjectRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// The outcome of resolving a progress reference.
#[derive(Debug)]
pub enum ResolvedProgress {
    /// The reference was a progress record id.
    One(ProgressRecord),
    /// The reference identified a project (by id or name); all of its
    /// progress records, in creation order.
    Many(Vec<ProgressRecord>),
}

/// Resolve a project reference: an id-shaped string is looked up by id,
/// anything else by exact project name.
pub async fn resolve_project(pool: &PgPool, reference: &str) -> AppResult<Project> {
    let project = match reference.parse::<DbId>() {
        Ok(id) => ProjectRepo::find_by_id(pool, id).await?,
        Err(_) => ProjectRepo::find_by_name(pool, reference).await?,
    };
    project.ok_or_else(|| {
        CoreError::NotFoundNamed {
            entity: "project",
            name: reference.to_string(),
        }
        .into()
    })
}

/// Resolve a progress reference using the documented fallback order.
pub async fn resolve_progress(pool: &PgPool, reference: &str) -> AppResult<ResolvedProgress> {
    if let Ok(id) = reference.parse::<DbId>() {
        if let Some(record) = ProgressRepo::find_by_id(pool, id).await? {
            return Ok(ResolvedProgress::One(record));
        }
        // Not a record id; fall back to treating it as a project id.
        if ProjectRepo::find_by_id(pool, id).await?.is_some() {
            let records = ProgressRepo::list_by_project(pool, id).await?;
            return Ok(ResolvedProgress::Many(records));
        }
        return Err(CoreError::NotFound {
            entity: "progress record",
            id,
        }
        .into());
    }

    let project = ProjectRepo::find_by_name(pool, reference)
        .await?
        .ok_or_else(|| CoreError::NotFoundNamed {
            entity: "project",
            name: reference.to_string(),
        })?;
    let records = ProgressRepo::list_by_project(pool, project.id).await?;
    Ok(ResolvedProgress::Many(records))
}
