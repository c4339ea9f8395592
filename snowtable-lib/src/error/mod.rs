//! Error types

mod api;
mod field;

use std::convert::Infallible;

pub use api::*;
pub use field::*;

/// Errors returned by table operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller built a request that cannot be sent.
    ///
    /// Always raised before any request is dispatched.
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// Zero records matched where exactly one was required.
    #[error("No records matched the query")]
    NoResults,

    /// More than one record matched where exactly one was required.
    #[error("Multiple records matched where exactly one was expected")]
    MultipleResults,

    /// A record lacked a field the operation depends on.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Transport or protocol failure, passed through unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Creates a new usage error.
    pub fn invalid_usage(message: impl Into<String>) -> Self {
        Self::InvalidUsage(message.into())
    }

    /// Returns `true` if this is a usage error.
    pub fn is_invalid_usage(&self) -> bool {
        matches!(self, Self::InvalidUsage(_))
    }

    /// Returns `true` if no records matched.
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults)
    }

    /// Returns `true` if several records matched.
    pub fn is_multiple_results(&self) -> bool {
        matches!(self, Self::MultipleResults)
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
