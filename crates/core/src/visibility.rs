//! Ownership and institution-scoped visibility rules for projects.
//!
//! Listing grants read, not write: an institution peer may view another
//! creator's project but only the creator (or an admin) may mutate it.

use crate::roles::Role;
use crate::types::DbId;

/// The authenticated identity a request acts as.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user_id: DbId,
    pub role: Role,
    /// Scoping key matched against `projects.institution`.
    pub institution_id: Option<String>,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// May the viewer read this project?
///
/// Admin sees all; otherwise the creator or anyone from the same institution.
pub fn can_view_project(
    viewer: &Viewer,
    created_by: Option<DbId>,
    institution: Option<&str>,
) -> bool {
    if viewer.is_admin() {
        return true;
    }
    if created_by == Some(viewer.user_id) {
        return true;
    }
    match (viewer.institution_id.as_deref(), institution) {
        (Some(mine), Some(theirs)) => mine == theirs,
        _ => false,
    }
}

/// May the viewer update or delete this project? Creator or admin only.
pub fn can_mutate_project(viewer: &Viewer, created_by: Option<DbId>) -> bool {
    viewer.is_admin() || created_by == Some(viewer.user_id)
}
