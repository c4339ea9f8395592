//! Transport and protocol errors

use std::time::Duration;

use serde::Deserialize;

/// A request could not be completed, or the server refused it.
///
/// These pass through the client unchanged; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body of a success response was not a table API result.
    #[error("Unexpected response body: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Builds an HTTP error from a failed response body.
    ///
    /// The table API answers failures with `{"error": {"message", "detail"}}`;
    /// any other body is kept verbatim as the message.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Http {
                status,
                message: envelope.error.message,
                detail: envelope.error.detail,
            },
            Err(_) => Self::http(status, body),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a parse error that keeps the offending body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the status of an [`ApiError::Http`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server-supplied error detail, if available.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    detail: Option<String>,
}
