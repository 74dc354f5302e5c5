//! Display-only currency conversion.
//!
//! Stored monetary values are always in the native currency (LKR). Switching
//! the display currency converts on the way out and never writes back: the
//! access policy refuses financial-field edits while a non-native display
//! currency is active.

/// The native currency every monetary value is stored in.
pub const NATIVE_CURRENCY: &str = "LKR";

/// Approximate exchange rates, base LKR = 1. Fixed at build time.
pub const EXCHANGE_RATES: &[(&str, f64)] = &[
    ("LKR", 1.0),
    ("USD", 0.0033),
    ("GBP", 0.0026),
    ("EUR", 0.0031),
    ("CNY", 0.024),
    ("JPY", 0.49),
    ("AUD", 0.0051),
];

/// Look up the conversion rate for a currency code. `None` for unknown codes.
pub fn rate(currency: &str) -> Option<f64> {
    EXCHANGE_RATES
        .iter()
        .find(|(code, _)| *code == currency)
        .map(|(_, r)| *r)
}

/// Is this the native stored currency?
pub fn is_native(currency: &str) -> bool {
    currency == NATIVE_CURRENCY
}

/// Convert a native (LKR) value for display in `target` currency.
///
/// Returns `None` for unknown currency codes so callers can reject the
/// request rather than display garbage.
pub fn convert(native_value: f64, target: &str) -> Option<f64> {
    rate(target).map(|r| native_value * r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_is_identity() {
        assert_eq!(convert(12_345.67, "LKR"), Some(12_345.67));
        assert!(is_native("LKR"));
        assert!(!is_native("USD"));
    }

    #[test]
    fn test_known_rates() {
        let usd = convert(1_000_000.0, "USD").unwrap();
        assert!((usd - 3_300.0).abs() < 1e-6);
        let jpy = convert(100.0, "JPY").unwrap();
        assert!((jpy - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_currency_rejected() {
        assert_eq!(convert(100.0, "XXX"), None);
        assert_eq!(rate(""), None);
    }
}
