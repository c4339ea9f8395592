//! The three accepted shapes of a query.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::api::query::Filter;
use crate::api::query::filter_to_query;
use crate::error::Error;
use crate::model::Value;

/// What a caller asks for: a structured filter, a pre-formed encoded query,
/// or a flat field/value mapping.
///
/// Each shape renders to an encoded-query string exactly once, when the
/// request parameters are composed.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use snowtable_lib::api::query::{Filter, QuerySpec};
///
/// let raw = QuerySpec::from("active=true^priority=1");
/// let structured = QuerySpec::from(Filter::eq("active", true));
/// let mapping: QuerySpec = [("number", "INC0010001")].into_iter().collect();
///
/// assert_eq!(mapping.render().unwrap(), "number=INC0010001");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    /// A structured filter expression.
    Filter(Filter),
    /// A pre-formed encoded query, passed through untouched.
    Raw(String),
    /// Field/value equality pairs, ANDed together.
    Mapping(BTreeMap<String, Value>),
}

impl QuerySpec {
    /// Matches every record.
    pub fn all() -> Self {
        QuerySpec::Raw(String::new())
    }

    /// Renders to an encoded-query string.
    pub fn render(&self) -> Result<String, Error> {
        match self {
            QuerySpec::Filter(filter) => filter_to_query(filter),
            QuerySpec::Raw(raw) => Ok(raw.clone()),
            QuerySpec::Mapping(pairs) => Ok(pairs
                .iter()
                .map(|(field, value)| format!("{}={}", field, value.to_query_string()))
                .collect::<Vec<_>>()
                .join("^")),
        }
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Filter> for QuerySpec {
    fn from(filter: Filter) -> Self {
        QuerySpec::Filter(filter)
    }
}

impl From<String> for QuerySpec {
    fn from(raw: String) -> Self {
        QuerySpec::Raw(raw)
    }
}

impl From<&str> for QuerySpec {
    fn from(raw: &str) -> Self {
        QuerySpec::Raw(raw.to_string())
    }
}

impl From<BTreeMap<String, Value>> for QuerySpec {
    fn from(pairs: BTreeMap<String, Value>) -> Self {
        QuerySpec::Mapping(pairs)
    }
}

impl From<HashMap<String, Value>> for QuerySpec {
    fn from(pairs: HashMap<String, Value>) -> Self {
        QuerySpec::Mapping(pairs.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QuerySpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QuerySpec::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl TryFrom<JsonValue> for QuerySpec {
    type Error = Error;

    /// Strings become raw queries and objects of scalars become mappings;
    /// any other JSON shape is rejected.
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::String(raw) => Ok(QuerySpec::Raw(raw)),
            JsonValue::Object(map) => map
                .iter()
                .map(|(k, v)| Value::try_from(v).map(|v| (k.clone(), v)))
                .collect::<Result<BTreeMap<_, _>, Error>>()
                .map(QuerySpec::Mapping),
            other => Err(Error::invalid_usage(format!(
                "query must be a string, a mapping or a filter expression, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_raw_passthrough() {
        let spec = QuerySpec::from("anything^goes^ORDERBYnumber");
        assert_eq!(spec.render().unwrap(), "anything^goes^ORDERBYnumber");
    }

    #[test]
    fn test_mapping_renders_sorted_pairs() {
        let spec: QuerySpec = [("priority", Value::from(1)), ("active", Value::from(true))]
            .into_iter()
            .collect();
        assert_eq!(spec.render().unwrap(), "active=true^priority=1");
    }

    #[test]
    fn test_json_object_becomes_mapping() {
        let spec = QuerySpec::try_from(json!({"number": "INC0010001"})).unwrap();
        assert_eq!(spec.render().unwrap(), "number=INC0010001");
    }

    #[test]
    fn test_unsupported_json_is_invalid_usage() {
        for value in [json!(42), json!([1, 2]), json!(true), json!(null), json!({"a": {"b": 1}})] {
            assert!(QuerySpec::try_from(value).unwrap_err().is_invalid_usage());
        }
    }
}
