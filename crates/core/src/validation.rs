//! Input validation shared by registration and progress handlers.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::roles::Role;

/// Minimum password length accepted at registration and password change.
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("static regex compiles")
    })
}

/// Validate an email address format.
pub fn validate_email(email: &str) -> CoreResult<()> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(CoreError::Validation("Invalid email format".into()))
    }
}

/// Validate password strength (minimum length only, per policy).
pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Validate a role name supplied at registration.
pub fn validate_role(role: &str) -> CoreResult<Role> {
    Role::parse(role).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid role '{role}'. Valid roles: {}",
            Role::all_names().join(", ")
        ))
    })
}

/// Validate that a named field holds a percentage in [0, 100].
pub fn validate_percentage(field: &str, value: f64) -> CoreResult<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be between 0 and 100 (got {value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for email in [
            "staff@mohe.gov.lk",
            "a.b-c@uni-colombo.ac.lk",
            "user1@example.com",
        ] {
            assert!(validate_email(email).is_ok(), "should accept {email}");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in ["", "no-at-sign", "@missing.local", "user@", "user@host"] {
            assert!(validate_email(email).is_err(), "should reject {email}");
        }
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_role_validation() {
        assert_eq!(validate_role("registrar").unwrap(), Role::Registrar);
        let err = validate_role("clerk").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(validate_percentage("year_end_progress_percentage", 0.0).is_ok());
        assert!(validate_percentage("year_end_progress_percentage", 100.0).is_ok());
        assert!(validate_percentage("year_end_progress_percentage", 100.1).is_err());
        assert!(validate_percentage("year_end_progress_percentage", -1.0).is_err());
    }
}
