//! Client-side error type for API calls.

use serde_json::Value;

/// Error raised by the request gateway.
///
/// `Display` is what the operator sees verbatim in the status line: for
/// `Http` errors it is the server-supplied `detail` when one was present,
/// otherwise a message carrying the numeric status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    Network(String),
    /// The server answered with a non-2xx status.
    Http { status: u16, detail: Option<String> },
    /// A success response did not match the shape the caller expected.
    Deserialize(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::Http {
                detail: Some(detail),
                ..
            } => write!(f, "{detail}"),
            ApiError::Http {
                status,
                detail: None,
            } => write!(f, "HTTP {status}"),
            ApiError::Deserialize(msg) => write!(f, "Unexpected response shape: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Pull the `detail` field out of an error body, if the server sent one.
pub fn error_detail(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(Value::as_str)
        .filter(|detail| !detail.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_error_displays_server_detail_verbatim() {
        let err = ApiError::Http {
            status: 400,
            detail: Some("email taken".to_string()),
        };
        assert_eq!(err.to_string(), "email taken");
    }

    #[test]
    fn http_error_without_detail_names_the_status() {
        let err = ApiError::Http {
            status: 503,
            detail: None,
        };
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn error_detail_ignores_missing_or_blank_fields() {
        assert_eq!(
            error_detail(&json!({"detail": "nope"})),
            Some("nope".to_string())
        );
        assert_eq!(error_detail(&json!({"detail": "  "})), None);
        assert_eq!(error_detail(&json!({"detail": 42})), None);
        assert_eq!(error_detail(&json!({})), None);
    }
}
