//! Field-level access policy for progress records.
//!
//! The browser form applied these rules client-side to keep the UI forgiving;
//! the server re-applies them here before anything is persisted, so a client
//! bypassing the UI cannot write fields outside its role's permitted set.

use serde_json::Map;

use crate::roles::Role;

/// Basic descriptive fields, editable by physical staff alongside the
/// physical section (they own record creation and the project selector).
pub const BASIC_FIELDS: &[&str] = &[
    "project_id",
    "progress_name",
    "main_objective",
    "location",
    "total_cost_original",
    "total_cost_current",
    "awarded_amount",
    "revised_end_date",
    "funding_source",
];

/// Physical-progress fields, owned by the physical role group.
pub const PHYSICAL_FIELDS: &[&str] = &[
    "overall_target",
    "progress_as_of_prev_dec_percentage",
    "target_year",
    "target_month",
    "progress_date",
    "current_year_descriptive_target",
    "quarter1_target_percentage",
    "quarter2_target_percentage",
    "quarter3_target_percentage",
    "quarter4_target_percentage",
    "year_end_progress_description",
    "year_end_progress_percentage",
    "cumulative_target_at_year_end",
    "cumulative_progress_description_at_year_end",
    "physical_progress_image1",
    "physical_progress_image2",
    "physical_progress_image3",
    "physical_target_failure_reasons",
    "contractors",
    "consultants",
];

/// Financial-progress fields, owned by the financial role group.
pub const FINANCIAL_FIELDS: &[&str] = &[
    "allocation_current_year",
    "expenditure_target",
    "imprest_requested",
    "imprest_received",
    "actual_expenditure",
    "bills_in_hand",
    "price_escalation",
    "cumulative_expenditure_at_year_end",
    "financial_target_failure_reasons",
];

/// Server-computed fields. Writable by no role; always recomputed.
pub const DERIVED_FIELDS: &[&str] = &["cumulative_progress_percentage_of_overall_target"];

/// Which section of the progress form a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Basic,
    Physical,
    Financial,
    Derived,
}

/// Classify a progress-record field name. Returns `None` for names the
/// policy does not govern (e.g. `status`, which the lifecycle module owns).
pub fn classify(field: &str) -> Option<FieldGroup> {
    if BASIC_FIELDS.contains(&field) {
        Some(FieldGroup::Basic)
    } else if PHYSICAL_FIELDS.contains(&field) {
        Some(FieldGroup::Physical)
    } else if FINANCIAL_FIELDS.contains(&field) {
        Some(FieldGroup::Financial)
    } else if DERIVED_FIELDS.contains(&field) {
        Some(FieldGroup::Derived)
    } else {
        None
    }
}

/// May `role` edit `field`? `editing` is the role's explicit edit-mode flag;
/// when false all fields are frozen for that role.
pub fn can_edit_field(role: Role, field: &str, editing: bool) -> bool {
    let Some(group) = classify(field) else {
        return false;
    };
    if !editing {
        return false;
    }
    match role {
        Role::PhysicalStaff => matches!(group, FieldGroup::Basic | FieldGroup::Physical),
        Role::FinancialStaff => group == FieldGroup::Financial,
        // Admin manages projects and users; progress fields are staff-owned.
        // Registrar is view-and-submit only.
        Role::Admin | Role::Registrar => false,
    }
}

/// Outcome of screening a mutation payload against the policy.
#[derive(Debug, Default)]
pub struct ScreenReport {
    /// Governed fields the role was allowed to keep.
    pub kept: Vec<String>,
    /// Governed fields removed from the payload.
    pub dropped: Vec<String>,
}

impl ScreenReport {
    /// True when the payload carried governed fields but none survived.
    /// Callers treat this as a Forbidden condition.
    pub fn all_rejected(&self) -> bool {
        self.kept.is_empty() && !self.dropped.is_empty()
    }
}

/// Remove from `payload` every governed field `role` may not edit.
///
/// Ungoverned keys (`status`, unknown fields) are left untouched; derived
/// fields are stripped for every role since the server recomputes them.
pub fn screen_payload(
    role: Role,
    editing: bool,
    payload: &mut Map<String, serde_json::Value>,
) -> ScreenReport {
    let mut report = ScreenReport::default();
    let governed: Vec<String> = payload
        .keys()
        .filter(|k| classify(k).is_some())
        .cloned()
        .collect();

    for field in governed {
        if can_edit_field(role, &field, editing) {
            report.kept.push(field);
        } else {
            payload.remove(&field);
            report.dropped.push(field);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_physical_staff_owns_basic_and_physical() {
        assert!(can_edit_field(Role::PhysicalStaff, "project_id", true));
        assert!(can_edit_field(Role::PhysicalStaff, "overall_target", true));
        assert!(can_edit_field(
            Role::PhysicalStaff,
            "quarter3_target_percentage",
            true
        ));
        assert!(!can_edit_field(
            Role::PhysicalStaff,
            "actual_expenditure",
            true
        ));
    }

    #[test]
    fn test_financial_staff_owns_financial_only() {
        assert!(can_edit_field(
            Role::FinancialStaff,
            "allocation_current_year",
            true
        ));
        assert!(!can_edit_field(Role::FinancialStaff, "overall_target", true));
        assert!(!can_edit_field(Role::FinancialStaff, "project_id", true));
    }

    #[test]
    fn test_edit_flag_freezes_everything() {
        assert!(!can_edit_field(Role::PhysicalStaff, "overall_target", false));
        assert!(!can_edit_field(
            Role::FinancialStaff,
            "bills_in_hand",
            false
        ));
    }

    #[test]
    fn test_registrar_and_admin_edit_nothing() {
        for field in BASIC_FIELDS
            .iter()
            .chain(PHYSICAL_FIELDS)
            .chain(FINANCIAL_FIELDS)
        {
            assert!(!can_edit_field(Role::Registrar, field, true));
            assert!(!can_edit_field(Role::Admin, field, true));
        }
    }

    #[test]
    fn test_derived_field_writable_by_nobody() {
        for role in [
            Role::Admin,
            Role::PhysicalStaff,
            Role::FinancialStaff,
            Role::Registrar,
        ] {
            assert!(!can_edit_field(
                role,
                "cumulative_progress_percentage_of_overall_target",
                true
            ));
        }
    }

    #[test]
    fn test_screen_drops_foreign_fields() {
        let mut payload = json!({
            "overall_target": "Complete the building",
            "actual_expenditure": 1_500_000.0,
            "status": "draft"
        })
        .as_object()
        .cloned()
        .unwrap();

        let report = screen_payload(Role::PhysicalStaff, true, &mut payload);
        assert_eq!(report.kept, vec!["overall_target"]);
        assert_eq!(report.dropped, vec!["actual_expenditure"]);
        assert!(!report.all_rejected());
        // Ungoverned keys pass through untouched.
        assert!(payload.contains_key("status"));
        assert!(!payload.contains_key("actual_expenditure"));
    }

    #[test]
    fn test_screen_all_rejected_for_registrar() {
        let mut payload = json!({"year_end_progress_percentage": 40})
            .as_object()
            .cloned()
            .unwrap();
        let report = screen_payload(Role::Registrar, true, &mut payload);
        assert!(report.all_rejected());
        assert!(payload.is_empty());
    }

    #[test]
    fn test_screen_strips_derived_for_owner_role() {
        let mut payload = json!({
            "cumulative_progress_percentage_of_overall_target": 120,
            "year_end_progress_percentage": 40
        })
        .as_object()
        .cloned()
        .unwrap();
        let report = screen_payload(Role::PhysicalStaff, true, &mut payload);
        assert_eq!(report.kept, vec!["year_end_progress_percentage"]);
        assert!(!payload.contains_key("cumulative_progress_percentage_of_overall_target"));
    }
}
