//! Record field access errors

use serde_json::Value as JsonValue;

/// A record field could not be read as requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The record has no such field, or it is null.
    #[error("Record has no value for '{field}'")]
    Missing { field: String },

    /// The field holds a JSON value other than a string.
    #[error("Record field '{field}' is a {found}, not a string")]
    NotString { field: String, found: &'static str },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// Creates an error describing what `value` holds instead of a string.
    pub fn not_string(field: impl Into<String>, value: &JsonValue) -> Self {
        let found = match value {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "bool",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        };
        Self::NotString {
            field: field.into(),
            found,
        }
    }

    /// Returns the name of the field involved.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::NotString { field, .. } => field,
        }
    }
}
