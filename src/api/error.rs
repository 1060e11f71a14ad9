//! API Error Types
//!
//! Errors returned by the MediReminder API client, plus the extraction of a
//! human-readable message from the backend's error bodies.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the MediReminder API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (DNS, connection refused, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-success HTTP status; `message` is what the backend reported
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status but the body was not the expected JSON
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Success status with no body where a record was expected
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// No session token is available for an authenticated route
    #[error("Not logged in")]
    Unauthenticated,
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }

    /// HTTP status code, when the failure came from the backend
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated) || self.status() == Some(401)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Build the message for a failed response.
///
/// The backend reports errors as `{"detail": ...}` where `detail` is either a
/// plain string or a list of validation entries carrying a `msg` field. List
/// entries are joined with `", "`. Anything else falls back to a generic
/// message naming the status code.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status);

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return fallback(),
    };

    match parsed.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(entries)) => {
            let messages: Vec<String> = entries
                .iter()
                .map(|entry| match entry {
                    Value::String(s) => s.clone(),
                    Value::Object(obj) => match obj.get("msg") {
                        Some(Value::String(msg)) => msg.clone(),
                        Some(other) => other.to_string(),
                        None => entry.to_string(),
                    },
                    other => other.to_string(),
                })
                .collect();

            if messages.is_empty() {
                fallback()
            } else {
                messages.join(", ")
            }
        }
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_list_joined() {
        let body = r#"{"detail":[{"msg":"x"},{"msg":"y"}]}"#;
        assert_eq!(extract_error_message(422, body), "x, y");
    }

    #[test]
    fn test_detail_string() {
        let body = r#"{"detail":"Invalid credentials"}"#;
        assert_eq!(extract_error_message(401, body), "Invalid credentials");
    }

    #[test]
    fn test_unparsable_body() {
        assert_eq!(
            extract_error_message(502, "<html>Bad Gateway</html>"),
            "Request failed with status 502"
        );
        assert_eq!(extract_error_message(500, ""), "Request failed with status 500");
    }

    #[test]
    fn test_json_without_detail() {
        assert_eq!(
            extract_error_message(404, r#"{"error":"nope"}"#),
            "Request failed with status 404"
        );
    }

    #[test]
    fn test_fastapi_validation_entry() {
        let body = r#"{"detail":[{"loc":["body","time"],"msg":"field required","type":"value_error.missing"}]}"#;
        assert_eq!(extract_error_message(422, body), "field required");
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "Identifier is required".to_string(),
        };
        assert_eq!(err.to_string(), "Identifier is required");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_unauthorized());
        assert!(ApiError::Unauthenticated.is_unauthorized());
    }
}
