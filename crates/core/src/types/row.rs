//! Store rows.

use serde_json::Value;

/// A single store row as a JSON object.
///
/// Columns are kept verbatim; the dispatcher only reads the handful it needs.
pub type Row = serde_json::Map<String, Value>;

/// JavaScript-style truthiness of a JSON value.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy. Everything else, including
/// empty arrays and objects, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
