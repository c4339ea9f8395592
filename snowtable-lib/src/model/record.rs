//! Dynamic table record

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value as JsonValue;

use crate::error::FieldError;

/// Name of the field that uniquely identifies a record.
pub const SYS_ID: &str = "sys_id";

/// A record returned by the table API.
///
/// Records are opaque field maps. The client never interprets field values,
/// except for reading [`SYS_ID`] to address follow-up requests.
///
/// # Example
///
/// ```
/// use snowtable_lib::model::Record;
///
/// let record = Record::new()
///     .set("short_description", "Printer on fire")
///     .set("priority", 1);
///
/// assert_eq!(record.get_str("short_description").unwrap(), Some("Printer on fire"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, JsonValue>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record identifier.
    pub fn sys_id(&self) -> Result<&str, FieldError> {
        self.get_str(SYS_ID)?.ok_or_else(|| FieldError::missing(SYS_ID))
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Returns a string field.
    ///
    /// `Ok(None)` for a missing or null field, an error if the field holds
    /// something other than a string.
    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(FieldError::not_string(field, other)),
        }
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<JsonValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<JsonValue> {
        self.fields.remove(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// Consumes the record and returns the underlying field map.
    pub fn into_fields(self) -> Map<String, JsonValue> {
        self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }
}
