//! Inbound request shapes.
//!
//! Callers post `{ "action": "...", "userData": {...} }`. The body is parsed
//! once into an [`IncomingRequest`] and then narrowed into a typed [`Action`]
//! so the shape of `userData` is checked before any store call is made.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::id::RowId;
use super::row::{Row, is_truthy};

/// Errors raised while turning a request body into an [`Action`].
#[derive(Debug, Error)]
pub enum ActionError {
    /// The body is not a JSON object.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// `userData` does not match the shape the action requires.
    #[error("invalid userData for {action}: {source}")]
    InvalidUserData {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw request body before `userData` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingRequest {
    /// Operation name, e.g. `createUser`. Missing or non-string names are
    /// kept as-is and end up unsupported.
    #[serde(default)]
    pub action: Value,
    /// Action-specific payload. Missing is treated as `null`.
    #[serde(rename = "userData", default)]
    pub user_data: Value,
}

impl IncomingRequest {
    /// Narrow the raw payload into a typed action.
    ///
    /// Unknown action names are not an error here; they become
    /// [`Action::Unsupported`] and are rejected by the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::InvalidUserData` if `userData` does not match
    /// the shape required by a known action.
    pub fn into_action(self) -> Result<Action, ActionError> {
        let name = match self.action {
            Value::String(name) => name,
            other => return Ok(Action::Unsupported(other.to_string())),
        };

        match name.as_str() {
            Action::CREATE_USER => serde_json::from_value(self.user_data)
                .map(Action::CreateUser)
                .map_err(|source| ActionError::InvalidUserData {
                    action: Action::CREATE_USER,
                    source,
                }),
            Action::UPDATE_USER => serde_json::from_value(self.user_data)
                .map(Action::UpdateUser)
                .map_err(|source| ActionError::InvalidUserData {
                    action: Action::UPDATE_USER,
                    source,
                }),
            _ => Ok(Action::Unsupported(name)),
        }
    }
}

/// A dispatchable operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Insert a user row, plus an artisan row when `is_artisan` is truthy.
    CreateUser(CreateUserInput),
    /// Patch an existing user row.
    UpdateUser(UpdateUserInput),
    /// Any other action name.
    Unsupported(String),
}

impl Action {
    /// Wire name of the create operation.
    pub const CREATE_USER: &'static str = "createUser";
    /// Wire name of the update operation.
    pub const UPDATE_USER: &'static str = "updateUser";

    /// Parse a request body straight into an action.
    ///
    /// # Errors
    ///
    /// Returns `ActionError::MalformedBody` if the bytes are not a JSON object,
    /// or `ActionError::InvalidUserData` if the payload does not fit the
    /// named action.
    pub fn from_json(body: &[u8]) -> Result<Self, ActionError> {
        serde_json::from_slice::<IncomingRequest>(body)
            .map_err(ActionError::MalformedBody)?
            .into_action()
    }

    /// The action name as sent by the caller.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::CreateUser(_) => Self::CREATE_USER,
            Self::UpdateUser(_) => Self::UPDATE_USER,
            Self::Unsupported(name) => name,
        }
    }
}

/// Payload of `createUser`: the new user row, columns passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateUserInput {
    pub fields: Row,
}

impl CreateUserInput {
    /// Whether an artisan profile should be created alongside the user.
    #[must_use]
    pub fn is_artisan(&self) -> bool {
        self.fields.get("is_artisan").is_some_and(is_truthy)
    }

    /// The user's `full_name` column, whatever its JSON type.
    #[must_use]
    pub fn full_name(&self) -> Option<&Value> {
        self.fields.get("full_name")
    }

    /// The user's `craft_specialty`, if truthy.
    #[must_use]
    pub fn craft_specialty(&self) -> Option<&Value> {
        self.fields.get("craft_specialty").filter(|v| is_truthy(v))
    }
}

/// Payload of `updateUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserInput {
    /// Id of the user row to patch.
    #[serde(rename = "userId")]
    pub user_id: RowId,
    /// Columns to overwrite.
    pub updates: Row,
}
