use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Login rejected or the auth endpoint was unreachable. The message is
    /// ready for display: server-supplied detail when available, otherwise
    /// a generic fallback.
    #[error("{0}")]
    Authentication(String),

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Session refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in errors
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Map a non-success response onto the error taxonomy, preferring a
    /// server-supplied detail message over the raw body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_detail(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            400 | 422 => ApiError::Validation(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

/// Pull a human-readable message out of an error response body. Backends
/// report either `{"detail": "..."}` or `{"error": "..."}`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Outcome of a token refresh, shared by every request waiting on it.
/// Clone-able so one in-flight refresh can resolve many waiters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    #[error("no refresh token available")]
    MissingToken,

    #[error("{0}")]
    Failed(String),
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::MissingToken => ApiError::NoRefreshToken,
            RefreshError::Failed(message) => ApiError::RefreshFailed(message),
        }
    }
}
