// src/api/error.rs

use reqwest::StatusCode;
use thiserror::Error;

/// A non-success HTTP response. The message is the trimmed response body,
/// or the status's reason phrase when the body was blank.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {message}")]
pub struct FetchError {
    pub code: u16,
    pub message: String,
}

impl FetchError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Build from a status and the raw response body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let trimmed = body.trim();
        let message = if trimmed.is_empty() {
            reason_phrase(status)
        } else {
            trimmed.to_string()
        };
        Self::new(status.as_u16(), message)
    }

    /// Used for demo files that don't exist.
    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND.as_u16(),
            reason_phrase(StatusCode::NOT_FOUND),
        )
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

/// Everything `Api::read` / `Api::write` can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The caller's abort handle fired before the request settled.
    #[error("request cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for `Fetch`, `None` for everything else.
    pub fn code(&self) -> Option<u16> {
        match self {
            ApiError::Fetch(e) => Some(e.code),
            _ => None,
        }
    }

    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            ApiError::Fetch(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_trimmed_body() {
        let e = FetchError::from_response(StatusCode::NOT_FOUND, "  not found\n");
        assert_eq!(e, FetchError::new(404, "not found"));
    }

    #[test]
    fn test_message_falls_back_to_reason() {
        let e = FetchError::from_response(StatusCode::NOT_FOUND, " \n");
        assert_eq!(e.message, "Not Found");
        let e = FetchError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(e.code, 500);
        assert_eq!(e.message, "Internal Server Error");
    }

    #[test]
    fn test_api_error_accessors() {
        let err: ApiError = FetchError::new(403, "denied").into();
        assert_eq!(err.code(), Some(403));
        assert_eq!(err.to_string(), "HTTP 403: denied");
        assert!(!err.is_cancelled());
        assert!(ApiError::Cancelled.is_cancelled());
        assert_eq!(ApiError::Cancelled.code(), None);
    }
}
