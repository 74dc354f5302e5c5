//! Multipart form-field coercion.
//!
//! Browser forms post every value as text. Before a payload can be screened
//! and deserialized into a typed DTO, numeric, date, and boolean fields must
//! be coerced, and empty strings dropped entirely (an untouched form input
//! must not null out a stored value or fail numeric parsing).

use chrono::{DateTime, NaiveDate, Utc};
use promis_core::error::{CoreError, CoreResult};
use serde_json::{Map, Number, Value};

/// Fields coerced to floating-point numbers.
pub const NUMERIC_FIELDS: &[&str] = &[
    // Project
    "tec",
    "awarded_amount",
    // Progress
    "total_cost_original",
    "total_cost_current",
    "progress_as_of_prev_dec_percentage",
    "quarter1_target_percentage",
    "quarter2_target_percentage",
    "quarter3_target_percentage",
    "quarter4_target_percentage",
    "year_end_progress_percentage",
    "allocation_current_year",
    "expenditure_target",
    "imprest_requested",
    "imprest_received",
    "actual_expenditure",
    "bills_in_hand",
    "price_escalation",
    "cumulative_expenditure_at_year_end",
];

/// Fields coerced to integers.
pub const INTEGER_FIELDS: &[&str] = &["target_year"];

/// Fields coerced to RFC 3339 timestamps. Accepts either a full timestamp
/// or a plain `YYYY-MM-DD` date (normalized to midnight UTC).
pub const DATE_FIELDS: &[&str] = &[
    "duration_start",
    "duration_end",
    "revised_date",
    "start_date",
    "estimated_end_date",
    "extended_date",
    "return_periods_start",
    "return_periods_end",
    "npd_date",
    "cabinet_papers_date",
    "revised_end_date",
    "progress_date",
];

/// Fields coerced to booleans.
pub const BOOL_FIELDS: &[&str] = &["capital_works", "is_draft"];

/// Coerce raw text form fields into a typed JSON object.
///
/// Empty values are dropped. Unknown fields pass through as strings.
pub fn coerce_fields(raw: Vec<(String, String)>) -> CoreResult<Map<String, Value>> {
    let mut out = Map::new();
    for (name, value) in raw {
        if value.is_empty() {
            continue;
        }
        let coerced = if NUMERIC_FIELDS.contains(&name.as_str()) {
            let n: f64 = value.parse().map_err(|_| {
                CoreError::Validation(format!("{name} must be a number (got '{value}')"))
            })?;
            Value::Number(Number::from_f64(n).ok_or_else(|| {
                CoreError::Validation(format!("{name} must be a finite number"))
            })?)
        } else if INTEGER_FIELDS.contains(&name.as_str()) {
            let n: i64 = value.parse().map_err(|_| {
                CoreError::Validation(format!("{name} must be an integer (got '{value}')"))
            })?;
            Value::Number(Number::from(n))
        } else if DATE_FIELDS.contains(&name.as_str()) {
            Value::String(parse_date(&name, &value)?.to_rfc3339())
        } else if BOOL_FIELDS.contains(&name.as_str()) {
            match value.as_str() {
                "true" | "1" | "on" => Value::Bool(true),
                "false" | "0" | "off" => Value::Bool(false),
                other => {
                    return Err(CoreError::Validation(format!(
                        "{name} must be a boolean (got '{other}')"
                    )))
                }
            }
        } else {
            Value::String(value)
        };
        out.insert(name, coerced);
    }
    Ok(out)
}

fn parse_date(field: &str, value: &str) -> CoreResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    Err(CoreError::Validation(format!(
        "{field} must be an ISO date or timestamp (got '{value}')"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_values_dropped() {
        let out = coerce_fields(raw(&[("tec", ""), ("remarks", "")])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_numeric_coercion() {
        let out = coerce_fields(raw(&[("tec", "1500000.5")])).unwrap();
        assert_eq!(out["tec"], serde_json::json!(1_500_000.5));
    }

    #[test]
    fn test_bad_number_rejected_with_field_name() {
        let err = coerce_fields(raw(&[("awarded_amount", "lots")])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("awarded_amount"), "message was: {msg}");
    }

    #[test]
    fn test_plain_date_normalized_to_midnight_utc() {
        let out = coerce_fields(raw(&[("start_date", "2026-01-15")])).unwrap();
        let s = out["start_date"].as_str().unwrap();
        assert!(s.starts_with("2026-01-15T00:00:00"));
    }

    #[test]
    fn test_rfc3339_passes_through() {
        let out = coerce_fields(raw(&[("progress_date", "2026-03-31T10:30:00Z")])).unwrap();
        assert!(out["progress_date"].as_str().unwrap().contains("2026-03-31"));
    }

    #[test]
    fn test_bool_and_passthrough() {
        let out = coerce_fields(raw(&[
            ("capital_works", "true"),
            ("project_name", "Water Supply Phase II"),
        ]))
        .unwrap();
        assert_eq!(out["capital_works"], Value::Bool(true));
        assert_eq!(out["project_name"], "Water Supply Phase II");
    }

    #[test]
    fn test_integer_field() {
        let out = coerce_fields(raw(&[("target_year", "2026")])).unwrap();
        assert_eq!(out["target_year"], serde_json::json!(2026));
        assert!(coerce_fields(raw(&[("target_year", "20.5")])).is_err());
    }
}
