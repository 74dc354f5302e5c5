//! Progress record lifecycle: draft -> submitted.
//!
//! Submission is one-way in normal operation. Reverting a submitted record
//! back to draft is a deliberate policy choice, off by default and admin-only
//! when enabled (see `ALLOW_SUBMISSION_REVERT` in the server config).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;

/// Workflow state of a progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Draft,
    Submitted,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Draft => "draft",
            ProgressStatus::Submitted => "submitted",
        }
    }

    pub fn parse(s: &str) -> Option<ProgressStatus> {
        match s {
            "draft" => Some(ProgressStatus::Draft),
            "submitted" => Some(ProgressStatus::Submitted),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a requested status transition for the given role.
///
/// - draft -> draft: any staff role saving partial data (idempotent save).
/// - draft -> submitted: registrar or admin only.
/// - submitted -> submitted: no-op, allowed.
/// - submitted -> draft: admin only, and only when `allow_revert` is set.
pub fn check_transition(
    role: Role,
    from: ProgressStatus,
    to: ProgressStatus,
    allow_revert: bool,
) -> Result<(), CoreError> {
    use ProgressStatus::{Draft, Submitted};

    match (from, to) {
        (Draft, Draft) | (Submitted, Submitted) => Ok(()),
        (Draft, Submitted) => {
            if matches!(role, Role::Registrar | Role::Admin) {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "Only a registrar or admin may submit a progress record".into(),
                ))
            }
        }
        (Submitted, Draft) => {
            if !allow_revert {
                Err(CoreError::Forbidden(
                    "Submitted records cannot be reverted to draft".into(),
                ))
            } else if role == Role::Admin {
                Ok(())
            } else {
                Err(CoreError::Forbidden(
                    "Only an admin may revert a submitted record".into(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_save_is_open_to_staff() {
        for role in [Role::PhysicalStaff, Role::FinancialStaff, Role::Admin] {
            assert!(check_transition(
                role,
                ProgressStatus::Draft,
                ProgressStatus::Draft,
                false
            )
            .is_ok());
        }
    }

    #[test]
    fn test_only_registrar_or_admin_submits() {
        assert!(check_transition(
            Role::Registrar,
            ProgressStatus::Draft,
            ProgressStatus::Submitted,
            false
        )
        .is_ok());
        assert!(check_transition(
            Role::Admin,
            ProgressStatus::Draft,
            ProgressStatus::Submitted,
            false
        )
        .is_ok());
        for role in [Role::PhysicalStaff, Role::FinancialStaff] {
            let err = check_transition(
                role,
                ProgressStatus::Draft,
                ProgressStatus::Submitted,
                false,
            )
            .unwrap_err();
            assert!(matches!(err, CoreError::Forbidden(_)));
        }
    }

    #[test]
    fn test_revert_blocked_by_default() {
        let err = check_transition(
            Role::Admin,
            ProgressStatus::Submitted,
            ProgressStatus::Draft,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn test_revert_admin_only_when_enabled() {
        assert!(check_transition(
            Role::Admin,
            ProgressStatus::Submitted,
            ProgressStatus::Draft,
            true
        )
        .is_ok());
        let err = check_transition(
            Role::Registrar,
            ProgressStatus::Submitted,
            ProgressStatus::Draft,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn test_status_parse_round_trip() {
        assert_eq!(ProgressStatus::parse("draft"), Some(ProgressStatus::Draft));
        assert_eq!(
            ProgressStatus::parse("submitted"),
            Some(ProgressStatus::Submitted)
        );
        assert_eq!(ProgressStatus::parse("archived"), None);
    }
}
