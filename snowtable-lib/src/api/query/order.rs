//! Result ordering.

use crate::error::Error;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// Specifies the ordering of query results.
///
/// Earlier fields have higher sort priority. The list is never re-sorted.
///
/// # Example
///
/// ```
/// use snowtable_lib::api::query::{Direction, OrderBy};
///
/// let order = OrderBy::parse(["category", "-created_on"]).unwrap();
/// assert_eq!(order, OrderBy::asc("category").then_desc("created_on"));
/// assert_eq!(order.fields()[1], ("created_on".to_string(), Direction::Desc));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Desc)],
        }
    }

    /// Parses field names where a leading `-` means descending.
    pub fn parse<S: AsRef<str>>(entries: impl IntoIterator<Item = S>) -> Result<Self, Error> {
        let fields = entries
            .into_iter()
            .map(|entry| {
                let entry = entry.as_ref();
                let (field, direction) = match entry.strip_prefix('-') {
                    Some(field) => (field, Direction::Desc),
                    None => (entry, Direction::Asc),
                };
                if field.is_empty() {
                    return Err(Error::invalid_usage(format!(
                        "order_by entry {:?} names no field",
                        entry
                    )));
                }
                Ok((field.to_string(), direction))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }

    /// Returns `true` if no ordering is specified.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
