//! Wire-level query parameters.

use std::collections::BTreeMap;
use std::fmt;

/// Encoded query (filter and sort fragments).
pub const QUERY: &str = "sysparm_query";
/// Comma-separated projection.
pub const FIELDS: &str = "sysparm_fields";
/// Page size, or the total cap when pagination is suppressed.
pub const LIMIT: &str = "sysparm_limit";
/// Number of records to skip.
pub const OFFSET: &str = "sysparm_offset";
/// Turns `LIMIT` into a hard cap by dropping the page `Link` header.
pub const SUPPRESS_PAGINATION_HEADER: &str = "sysparm_suppress_pagination_header";
/// Return display values instead of raw values.
pub const DISPLAY_VALUE: &str = "sysparm_display_value";
/// Omit reference links from reference fields.
pub const EXCLUDE_REFERENCE_LINK: &str = "sysparm_exclude_reference_link";

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// How the `sysparm_limit` parameter is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Hard cap on the total number of records; no page links are returned.
    Cap(u32),
    /// Page size for link-driven streaming.
    PageSize(u32),
}

/// A flat mapping of wire parameter names to scalar values.
///
/// Keys are kept sorted so the encoded URL is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedParams {
    params: BTreeMap<String, ParamValue>,
}

impl ComposedParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.params.insert(key.into(), value.into())
    }

    /// Removes a parameter.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.params.remove(key)
    }

    /// Returns a parameter value.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Returns `true` if the parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns how `sysparm_limit` is used, if it is set.
    pub fn pagination(&self) -> Option<Pagination> {
        let limit = match self.get(LIMIT)? {
            ParamValue::Int(n) => u32::try_from(*n).ok()?,
            ParamValue::String(s) => s.parse().ok()?,
            ParamValue::Bool(_) => return None,
        };
        let suppressed = matches!(
            self.get(SUPPRESS_PAGINATION_HEADER),
            Some(ParamValue::Bool(true))
        );
        Some(if suppressed {
            Pagination::Cap(limit)
        } else {
            Pagination::PageSize(limit)
        })
    }

    /// Renders the parameters as string pairs for the query string.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ComposedParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_cap_requires_suppression_flag() {
        let params = ComposedParams::new()
            .with(LIMIT, 25u32)
            .with(SUPPRESS_PAGINATION_HEADER, true);
        assert_eq!(params.pagination(), Some(Pagination::Cap(25)));

        let params = ComposedParams::new().with(LIMIT, 25u32);
        assert_eq!(params.pagination(), Some(Pagination::PageSize(25)));

        assert_eq!(ComposedParams::new().pagination(), None);
    }

    #[test]
    fn test_pairs_are_sorted_strings() {
        let params = ComposedParams::new()
            .with(QUERY, "active=true")
            .with(LIMIT, 10u32)
            .with(DISPLAY_VALUE, false);
        assert_eq!(
            params.to_pairs(),
            vec![
                (DISPLAY_VALUE.to_string(), "false".to_string()),
                (LIMIT.to_string(), "10".to_string()),
                (QUERY.to_string(), "active=true".to_string()),
            ]
        );
    }
}
