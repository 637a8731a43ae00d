//! Uniform response body.

use serde::{Deserialize, Serialize};

use super::row::Row;

/// JSON body returned for every dispatched request.
///
/// ```json
/// {"success": true, "data": {"id": 1}}
/// {"success": false, "error": "Invalid action"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Successful outcome carrying the affected row.
    #[must_use]
    pub const fn success(data: Row) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed outcome carrying a human-readable message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Attach a row to a failure, e.g. a user that was written before a later step failed.
    #[must_use]
    pub fn with_data(mut self, data: Row) -> Self {
        self.data = Some(data);
        self
    }
}
