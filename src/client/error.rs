use crate::domain::validate::FieldError;
use serde_json::Value as JsonValue;

/// Every client failure, reduced to one user-facing message (its `Display`).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or timeout; no HTTP status was received.
    #[error("No connection. Check your network.")]
    Network(String),

    #[error("{}", status_message(.status, .detail))]
    Http {
        status: u16,
        /// Server message from `error` or `message`.
        detail: String,
        /// Server error code such as `STORE_UNAVAILABLE`.
        code: Option<String>,
        /// Per-field messages of a rejected submission.
        fields: Vec<FieldError>,
    },

    #[error("Unexpected server response: {0}")]
    Decode(String),
}

fn status_message(status: &u16, detail: &str) -> String {
    match status {
        400 => format!("Invalid data: {}", detail),
        401 => "Not authorized. Please sign in again.".to_string(),
        403 => "Access denied.".to_string(),
        404 => "Resource not found.".to_string(),
        500 => format!("Internal server error: {}", detail),
        other => format!("Error {}: {}", other, detail),
    }
}

impl ClientError {
    /// Builds the error for a non-success response. The payload may carry its
    /// text under `error` or `message`.
    pub fn from_response(status: u16, body: &JsonValue) -> Self {
        let detail = body
            .get("error")
            .and_then(JsonValue::as_str)
            .or_else(|| body.get("message").and_then(JsonValue::as_str))
            .unwrap_or("Unknown error")
            .to_string();
        let code = body
            .get("code")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let fields = body
            .get("fields")
            .cloned()
            .and_then(|f| serde_json::from_value::<Vec<FieldError>>(f).ok())
            .unwrap_or_default();
        ClientError::Http {
            status,
            detail,
            code,
            fields,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Messages for one field of a rejected submission.
    pub fn field_messages(&self, field: &str) -> Vec<&str> {
        match self {
            ClientError::Http { fields, .. } => fields
                .iter()
                .filter(|f| f.field == field)
                .map(|f| f.message.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The server is up but its backing store is not.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, ClientError::Http { code: Some(c), .. } if c == "STORE_UNAVAILABLE")
    }
}
