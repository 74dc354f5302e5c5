//! The four-role authorization model.
//!
//! Role names must match the CHECK constraint on `users.role` in the
//! migrations.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PHYSICAL_STAFF: &str = "physical_staff";
pub const ROLE_FINANCIAL_STAFF: &str = "financial_staff";
pub const ROLE_REGISTRAR: &str = "registrar";

/// A user's role. Stored as text; parsed at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    PhysicalStaff,
    FinancialStaff,
    Registrar,
}

impl Role {
    /// The wire/database representation of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::PhysicalStaff => ROLE_PHYSICAL_STAFF,
            Role::FinancialStaff => ROLE_FINANCIAL_STAFF,
            Role::Registrar => ROLE_REGISTRAR,
        }
    }

    /// Parse a stored role name. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_PHYSICAL_STAFF => Some(Role::PhysicalStaff),
            ROLE_FINANCIAL_STAFF => Some(Role::FinancialStaff),
            ROLE_REGISTRAR => Some(Role::Registrar),
            _ => None,
        }
    }

    /// All valid role names, for registration validation messages.
    pub fn all_names() -> [&'static str; 4] {
        [
            ROLE_ADMIN,
            ROLE_PHYSICAL_STAFF,
            ROLE_FINANCIAL_STAFF,
            ROLE_REGISTRAR,
        ]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_all_roles() {
        for name in Role::all_names() {
            let role = Role::parse(name).expect("known role name must parse");
            assert_eq!(role.as_str(), name);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(Role::parse("superuser").is_none());
        assert!(Role::parse("").is_none());
        // Legacy camelCase spelling is not accepted.
        assert!(Role::parse("physicalStaff").is_none());
    }
}
