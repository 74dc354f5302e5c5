//! Request handlers, grouped by resource.

pub mod auth;
pub mod progress;
pub mod project;
pub mod user;

use promis_core::currency;
use promis_core::error::CoreError;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;

/// Query parameters shared by read endpoints that render monetary values.
#[derive(Debug, Default, Deserialize)]
pub struct DisplayQuery {
    /// Display currency code; defaults to the native currency (LKR).
    pub display_currency: Option<String>,
}

impl DisplayQuery {
    /// The effective currency code, defaulting to native.
    pub fn currency(&self) -> &str {
        self.display_currency
            .as_deref()
            .unwrap_or(currency::NATIVE_CURRENCY)
    }

    /// Resolve the display conversion rate, rejecting unknown codes.
    pub fn rate(&self) -> AppResult<f64> {
        let code = self.currency();
        currency::rate(code)
            .ok_or_else(|| CoreError::Validation(format!("Unknown currency code '{code}'")).into())
    }
}

/// Scale the named monetary fields of a serialized record in place.
///
/// Display-only: callers serialize the stored (native) row first and convert
/// the copy. A rate of exactly 1.0 leaves the object untouched.
pub fn convert_money_fields(record: &mut Value, fields: &[&str], rate: f64) {
    if rate == 1.0 {
        return;
    }
    let Some(obj) = record.as_object_mut() else {
        return;
    };
    for field in fields {
        if let Some(v) = obj.get_mut(*field) {
            if let Some(n) = v.as_f64() {
                if let Some(converted) = serde_json::Number::from_f64(n * rate) {
                    *v = Value::Number(converted);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_query_defaults_to_native() {
        let q = DisplayQuery::default();
        assert_eq!(q.currency(), "LKR");
        assert_eq!(q.rate().unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_currency_rejected() {
        let q = DisplayQuery {
            display_currency: Some("XXX".into()),
        };
        assert!(q.rate().is_err());
    }

    #[test]
    fn test_convert_money_fields_scales_only_named() {
        let mut v = json!({"tec": 1_000_000.0, "year_end_progress_percentage": 40.0, "tec_null": null});
        convert_money_fields(&mut v, &["tec", "tec_null"], 0.0033);
        assert!((v["tec"].as_f64().unwrap() - 3_300.0).abs() < 1e-6);
        assert_eq!(v["year_end_progress_percentage"], 40.0);
        assert!(v["tec_null"].is_null());
    }

    #[test]
    fn test_native_rate_is_identity() {
        let mut v = json!({"tec": 123.45});
        convert_money_fields(&mut v, &["tec"], 1.0);
        assert_eq!(v["tec"], 123.45);
    }
}
