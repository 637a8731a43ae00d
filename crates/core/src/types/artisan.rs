//! Artisan profile rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::CreateUserInput;
use super::id::RowId;
use super::row::Row;

/// Specialty recorded when the caller does not send one.
pub const DEFAULT_CRAFT_SPECIALTY: &str = "General";

/// Artisan row to insert after its user row has been created.
///
/// Name and specialty are copied from the user payload without coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtisanDraft {
    /// Id of the owning user row.
    pub user_id: RowId,
    /// Copied from the user's `full_name`; `null` when absent.
    pub business_name: Value,
    /// Copied from the user's `craft_specialty`, or [`DEFAULT_CRAFT_SPECIALTY`].
    pub craft_specialty: Value,
}

impl ArtisanDraft {
    /// Build the artisan row for a freshly created user.
    #[must_use]
    pub fn for_user(user_id: RowId, input: &CreateUserInput) -> Self {
        Self {
            user_id,
            business_name: input.full_name().cloned().unwrap_or(Value::Null),
            craft_specialty: input
                .craft_specialty()
                .cloned()
                .unwrap_or_else(|| Value::from(DEFAULT_CRAFT_SPECIALTY)),
        }
    }

    /// Convert into the row sent to the store.
    #[must_use]
    pub fn into_row(self) -> Row {
        let mut row = Row::new();
        row.insert("user_id".to_owned(), self.user_id.to_value());
        row.insert("business_name".to_owned(), self.business_name);
        row.insert("craft_specialty".to_owned(), self.craft_specialty);
        row
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn input(value: &Value) -> CreateUserInput {
        CreateUserInput {
            fields: value.as_object().unwrap().clone(),
        }
    }

    #[test]
    fn test_draft_copies_name_and_specialty() {
        let draft = ArtisanDraft::for_user(
            RowId::Int(9),
            &input(&json!({"full_name": "Jane Doe", "craft_specialty": "Pottery"})),
        );

        assert_eq!(
            Value::Object(draft.into_row()),
            json!({"user_id": 9, "business_name": "Jane Doe", "craft_specialty": "Pottery"})
        );
    }

    #[test]
    fn test_draft_defaults_specialty() {
        let draft =
            ArtisanDraft::for_user(RowId::from("u-1"), &input(&json!({"full_name": "Ann"})));
        assert_eq!(draft.craft_specialty, json!(DEFAULT_CRAFT_SPECIALTY));
        assert_eq!(draft.user_id, RowId::from("u-1"));
    }

    #[test]
    fn test_draft_without_full_name_sends_null() {
        let row = ArtisanDraft::for_user(RowId::Int(1), &input(&json!({}))).into_row();
        assert_eq!(row.get("business_name"), Some(&Value::Null));
    }

    #[test]
    fn test_draft_copies_non_string_values() {
        let row = ArtisanDraft::for_user(
            RowId::Int(3),
            &input(&json!({"full_name": 7, "craft_specialty": 3})),
        )
        .into_row();

        assert_eq!(
            Value::Object(row),
            json!({"user_id": 3, "business_name": 7, "craft_specialty": 3})
        );
    }
}
