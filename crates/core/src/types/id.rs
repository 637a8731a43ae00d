//! Row identifiers.
//!
//! The hosted store may key `users` by a serial integer or by a uuid, so the
//! dispatcher never assumes one. [`RowId`] accepts either JSON shape and
//! renders back to the raw value used in `id=eq.<value>` filters.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primary key of a store row.
///
/// Serializes untagged, so `42` and `"4b1c..."` both round-trip unchanged.
///
/// # Example
///
/// ```rust
/// # use artisan_users_core::RowId;
/// let id: RowId = serde_json::from_str("42").unwrap();
/// assert_eq!(id, RowId::Int(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Integer key (serial / bigserial column).
    Int(i64),
    /// Text key (uuid or any other string column).
    Text(String),
}

impl RowId {
    /// Read a row id out of an arbitrary JSON value.
    ///
    /// Returns `None` for anything that is not an integer or a string.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Convert the id back into the JSON value it came from.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(id) => Value::from(*id),
            Self::Text(id) => Value::String(id.clone()),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_row_id_deserializes_integer_and_text() {
        let int: RowId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(int, RowId::Int(42));

        let text: RowId =
            serde_json::from_value(json!("7f1d5f7e-3b0e-4d8c-9a55-0c2a1c3f9e10")).unwrap();
        assert_eq!(
            text,
            RowId::Text("7f1d5f7e-3b0e-4d8c-9a55-0c2a1c3f9e10".to_string())
        );
    }

    #[test]
    fn test_row_id_rejects_other_shapes() {
        assert!(serde_json::from_value::<RowId>(json!(true)).is_err());
        assert!(serde_json::from_value::<RowId>(json!({"id": 1})).is_err());
        assert!(RowId::from_value(&json!(1.5)).is_none());
        assert!(RowId::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_row_id_display_is_raw_value() {
        assert_eq!(RowId::Int(7).to_string(), "7");
        assert_eq!(RowId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_row_id_to_value_preserves_json_type() {
        assert_eq!(RowId::Int(3).to_value(), json!(3));
        assert_eq!(RowId::from("x").to_value(), json!("x"));
    }
}
