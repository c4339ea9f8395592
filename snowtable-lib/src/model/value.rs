//! Scalar values used in query conditions

use chrono::DateTime;
use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::error::Error;

/// A scalar value that can appear on the right-hand side of a condition.
///
/// Values render to the encoded-query grammar with
/// [`to_query_string`](Value::to_query_string). Date-times render through the
/// server-side `gs.dateGenerate` helper so comparisons happen in the
/// instance's own time handling.
///
/// # Example
///
/// ```
/// use snowtable_lib::model::Value;
///
/// assert_eq!(Value::from("network").to_query_string(), "network");
/// assert_eq!(Value::from(3).to_query_string(), "3");
/// assert_eq!(Value::from(true).to_query_string(), "true");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Date-time value.
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Renders the value as it appears inside an encoded query.
    pub fn to_query_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => format!(
                "javascript:gs.dateGenerate('{}','{}')",
                dt.format("%Y-%m-%d"),
                dt.format("%H:%M:%S")
            ),
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<&JsonValue> for Value {
    type Error = Error;

    /// Accepts JSON scalars only; arrays and objects are rejected.
    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int(i)),
                None => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| Error::invalid_usage(format!("unsupported number {}", n))),
            },
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => Err(Error::invalid_usage(
                "query mapping values must be scalars",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_datetime_renders_date_generate() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(
            Value::from(dt).to_query_string(),
            "javascript:gs.dateGenerate('2024-03-01','08:30:00')"
        );
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::try_from(&json!(7)).unwrap(), Value::Int(7));
        assert_eq!(Value::try_from(&json!(1.5)).unwrap(), Value::Float(1.5));
        assert_eq!(Value::try_from(&json!("x")).unwrap(), Value::from("x"));
        assert_eq!(Value::try_from(&json!(null)).unwrap(), Value::Null);
    }

    #[test]
    fn test_from_json_rejects_nested() {
        assert!(Value::try_from(&json!([1, 2])).unwrap_err().is_invalid_usage());
        assert!(Value::try_from(&json!({"a": 1})).unwrap_err().is_invalid_usage());
    }
}
