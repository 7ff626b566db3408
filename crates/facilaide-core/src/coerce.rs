//! # Value Coercion
//!
//! Lenient conversions from raw JSON leaves to typed values. Every function
//! here returns `Option`: a value that cannot be coerced is simply absent,
//! never an error.

use serde_json::Value;

/// Coerce a raw JSON leaf into a finite number.
///
/// - Numbers are accepted as-is.
/// - Strings are trimmed, decimal commas become dots, then parsed.
/// - Empty strings, non-finite results (`"inf"`, `"NaN"`), booleans,
///   arrays, objects and `null` yield `None`.
///
/// ```
/// use facilaide_core::to_number;
/// use serde_json::json;
///
/// assert_eq!(to_number(&json!("1 234")), None);
/// assert_eq!(to_number(&json!(" 812,50 ")), Some(812.5));
/// assert_eq!(to_number(&json!(1500)), Some(1500.0));
/// ```
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse a decimal string, accepting a comma as decimal separator.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.replace(',', ".");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Render a number as JSON, preferring the integer representation when the
/// value is integral.
///
/// The calculation engine and downstream comparisons treat `42` and `42.0`
/// identically, but `serde_json::Value` does not: `json!(42) != json!(42.0)`.
/// Payload values therefore always go through this function.
pub fn json_number(n: f64) -> Value {
    const I64_BOUND: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.is_finite() && n.fract() == 0.0 && n.abs() < I64_BOUND {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Render an optional number, mapping `None` to JSON `null`.
pub fn json_optional_number(n: Option<f64>) -> Value {
    n.map(json_number).unwrap_or(Value::Null)
}

/// Extract a non-empty trimmed text value.
///
/// Only strings are accepted. Numbers are rejected so that a bare child age
/// (`7`) is never mistaken for a first name.
pub fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}
