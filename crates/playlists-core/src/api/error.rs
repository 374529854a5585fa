use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::SessionError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No authentication token")]
    MissingCredential,

    #[error("Authentication expired")]
    Expired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account already exists: {0}")]
    Conflict(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Map a failed response from the public `/auth` endpoints
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body.trim());
        match status.as_u16() {
            401 => ApiError::InvalidCredentials,
            409 => ApiError::Conflict(truncated),
            _ => ApiError::Status {
                status,
                body: truncated,
            },
        }
    }

    /// Non-success status from an authenticated endpoint
    pub fn unexpected_status(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            body: Self::truncate_body(body.trim()),
        }
    }

    /// True for the two conditions that mean "go log in"
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::MissingCredential | ApiError::Expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_distinguish_missing_from_expired() {
        assert_eq!(ApiError::MissingCredential.to_string(), "No authentication token");
        assert_eq!(ApiError::Expired.to_string(), "Authentication expired");
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::InvalidCredentials
        ));
        match ApiError::from_status(StatusCode::CONFLICT, "Email already exists\n") {
            ApiError::Conflict(body) => assert_eq!(body, "Email already exists"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, ""),
            ApiError::Status { status: StatusCode::BAD_REQUEST, .. }
        ));
    }

    #[test]
    fn test_truncate_body() {
        let long = "é".repeat(400);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
        assert!(ApiError::truncate_body("short").eq("short"));
    }

    #[test]
    fn test_needs_login() {
        assert!(ApiError::MissingCredential.needs_login());
        assert!(ApiError::Expired.needs_login());
        assert!(!ApiError::InvalidCredentials.needs_login());
    }
}
