//! Quarterly-target validation.
//!
//! Quarterly targets are cumulative: each quarter's percentage is the total
//! expected by the end of that quarter, so the sequence should be
//! non-decreasing and finish at 100. Violations are warnings, not hard
//! errors -- drafts are routinely saved half-filled.

/// Human-readable warnings for a quarterly-target tuple.
///
/// Missing quarters are treated as 0, matching the entry form. Never warns
/// for a well-formed ladder Q1 <= Q2 <= Q3 <= Q4 = 100, and stays silent on
/// an untouched tuple (all zeros).
pub fn validate_quarterly_targets(
    q1: Option<f64>,
    q2: Option<f64>,
    q3: Option<f64>,
    q4: Option<f64>,
) -> Vec<String> {
    let q1 = q1.unwrap_or(0.0);
    let q2 = q2.unwrap_or(0.0);
    let q3 = q3.unwrap_or(0.0);
    let q4 = q4.unwrap_or(0.0);

    let mut warnings = Vec::new();
    if q2 < q1 {
        warnings.push("Q2 target should be >= Q1".to_string());
    }
    if q3 < q2 {
        warnings.push("Q3 target should be >= Q2".to_string());
    }
    if q4 < q3 {
        warnings.push("Q4 target should be >= Q3".to_string());
    }
    if q4 != 0.0 && q4 != 100.0 {
        warnings.push("Q4 target should equal 100%".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_ladder_is_clean() {
        let w = validate_quarterly_targets(Some(10.0), Some(40.0), Some(75.0), Some(100.0));
        assert!(w.is_empty());
    }

    #[test]
    fn test_untouched_tuple_is_clean() {
        assert!(validate_quarterly_targets(None, None, None, None).is_empty());
        assert!(validate_quarterly_targets(Some(0.0), Some(0.0), Some(0.0), Some(0.0)).is_empty());
    }

    #[test]
    fn test_each_regression_flagged() {
        let w = validate_quarterly_targets(Some(50.0), Some(40.0), Some(60.0), Some(100.0));
        assert_eq!(w, vec!["Q2 target should be >= Q1"]);

        let w = validate_quarterly_targets(Some(10.0), Some(40.0), Some(30.0), Some(100.0));
        assert_eq!(w, vec!["Q3 target should be >= Q2"]);

        let w = validate_quarterly_targets(Some(10.0), Some(40.0), Some(75.0), Some(70.0));
        assert_eq!(
            w,
            vec!["Q4 target should be >= Q3", "Q4 target should equal 100%"]
        );
    }

    #[test]
    fn test_partial_q4_flagged() {
        let w = validate_quarterly_targets(Some(10.0), Some(20.0), Some(30.0), Some(90.0));
        assert_eq!(w, vec!["Q4 target should equal 100%"]);
    }

    #[test]
    fn test_missing_quarters_default_to_zero() {
        // Q1 filled, rest missing: Q2 (0) < Q1 regression fires.
        let w = validate_quarterly_targets(Some(25.0), None, None, None);
        assert!(w.contains(&"Q2 target should be >= Q1".to_string()));
    }
}
