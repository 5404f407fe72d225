use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error body shapes the backend is known to return.
///
/// Both fields are optional because different endpoints disagree on which one
/// they populate (`detail` for framework validation errors, `message` for
/// application errors).
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Framework-style error detail. May be a string or a structured value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// Application-level error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl ErrorResponse {
    /// Reads the known error fields from an arbitrary payload.
    ///
    /// Non-object payloads yield an empty response.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        match payload {
            Value::Object(map) => Self {
                detail: map.get("detail").filter(|v| !v.is_null()).cloned(),
                message: map.get("message").filter(|v| !v.is_null()).cloned(),
            },
            _ => Self::default(),
        }
    }

    /// The first usable message, `detail` before `message`.
    #[must_use]
    pub fn best_message(&self) -> Option<String> {
        [self.detail.as_ref(), self.message.as_ref()]
            .into_iter()
            .flatten()
            .find_map(render_field)
    }
}

fn render_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}

/// Builds the single human-readable message for a non-success response.
///
/// Order: `detail`, `message`, a bare string payload, then a generic status
/// message. Bodies that were not JSON reach this as a string payload.
#[must_use]
pub fn error_message(status: u16, payload: &Value) -> String {
    if let Some(message) = ErrorResponse::from_payload(payload).best_message() {
        return message;
    }

    match payload {
        Value::String(text) if !text.trim().is_empty() => text.clone(),
        _ => format!("Request failed with status {status}"),
    }
}

/// A form field rule that was not satisfied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Email is missing or too short.
    #[error("Enter a valid email address.")]
    Email,
    /// Password is shorter than the minimum length.
    #[error("Password must be at least {min} characters.")]
    Password {
        /// Minimum number of characters.
        min: usize,
    },
    /// Display name is shorter than the minimum length.
    #[error("Display name must be at least {min} characters.")]
    DisplayName {
        /// Minimum number of characters.
        min: usize,
    },
    /// Search query is shorter than the minimum length.
    #[error("Enter at least {min} characters.")]
    SearchQuery {
        /// Minimum number of characters.
        min: usize,
    },
    /// App name is blank.
    #[error("Name is required.")]
    AppName,
    /// Both summary and description are blank.
    #[error("Provide a summary or description.")]
    AppSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_takes_precedence() {
        let payload = json!({"detail": "Invalid credentials", "message": "ignored"});
        assert_eq!(error_message(401, &payload), "Invalid credentials");
    }

    #[test]
    fn test_message_used_when_detail_missing() {
        let payload = json!({"message": "Not allowed"});
        assert_eq!(error_message(403, &payload), "Not allowed");
    }

    #[test]
    fn test_empty_detail_falls_through_to_message() {
        let payload = json!({"detail": "", "message": "Use this"});
        assert_eq!(error_message(400, &payload), "Use this");
    }

    #[test]
    fn test_structured_detail_rendered_as_json() {
        let payload = json!({"detail": [{"loc": ["body", "email"], "msg": "field required"}]});
        let message = error_message(422, &payload);
        assert!(message.contains("field required"));
        assert!(message.starts_with('['));
    }

    #[test]
    fn test_string_payload() {
        assert_eq!(error_message(500, &json!("boom")), "boom");
    }

    #[test]
    fn test_json_object_with_raw_field_is_not_text() {
        let payload = json!({"raw": "<html>Bad Gateway</html>"});
        assert_eq!(error_message(502, &payload), "Request failed with status 502");
        assert_eq!(error_message(502, &json!("   ")), "Request failed with status 502");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(error_message(404, &Value::Null), "Request failed with status 404");
        assert_eq!(
            error_message(500, &json!({"error": true})),
            "Request failed with status 500"
        );
    }

    #[test]
    fn test_error_response_from_non_object() {
        assert_eq!(ErrorResponse::from_payload(&json!([1, 2])), ErrorResponse::default());
    }

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::AppName.to_string(), "Name is required.");
        assert_eq!(
            ValidationError::Password { min: 6 }.to_string(),
            "Password must be at least 6 characters."
        );
        assert_eq!(
            ValidationError::SearchQuery { min: 2 }.to_string(),
            "Enter at least 2 characters."
        );
    }
}
