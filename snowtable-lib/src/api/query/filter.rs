//! Structured filter expressions.

use std::fmt;

use crate::model::Value;

/// A comparison operator of the encoded-query grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    StartsWith,
    EndsWith,
    In,
    NotIn,
    Between,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    /// Returns the operator as written between field and operand.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::StartsWith => "STARTSWITH",
            Operator::EndsWith => "ENDSWITH",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::IsEmpty => "ISEMPTY",
            Operator::IsNotEmpty => "ISNOTEMPTY",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The right-hand side of a [`Condition`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Unary operators (`ISEMPTY`, `ISNOTEMPTY`).
    None,
    One(Value),
    /// Value list for `IN` / `NOT IN`.
    Many(Vec<Value>),
    /// Inclusive bounds for `BETWEEN`.
    Range(Value, Value),
}

/// A single `field<operator><operand>` test.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
}

/// A filter over table records.
///
/// Conditions combine into [`Filter::All`] and [`Filter::Any`] groups that
/// render to the encoded-query grammar (see [`filter_to_query`]). `Any` binds
/// tighter than `All`, and a top-level `Any` of `All` groups becomes a union
/// of independent queries.
///
/// # Example
///
/// ```
/// use snowtable_lib::api::query::Filter;
///
/// let urgent = Filter::and([
///     Filter::eq("active", true),
///     Filter::or([Filter::eq("priority", 1), Filter::eq("priority", 2)]),
/// ]);
///
/// let email = Filter::starts_with("short_description", "Email")
///     .and_also(Filter::is_not_empty("assigned_to"));
/// ```
///
/// [`filter_to_query`]: super::filter_to_query
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Condition(Condition),
    /// Every member must match (`^`).
    All(Vec<Filter>),
    /// At least one member must match (`^OR`).
    Any(Vec<Filter>),
    /// Encoded-query text passed through untouched.
    Raw(String),
}

impl Filter {
    /// Creates a condition from its parts.
    pub fn condition(field: impl Into<String>, operator: Operator, operand: Operand) -> Self {
        Filter::Condition(Condition {
            field: field.into(),
            operator,
            operand,
        })
    }

    fn compare(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::condition(field, operator, Operand::One(value.into()))
    }

    /// `field=value`; a null value tests for emptiness instead.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Eq, value)
    }

    /// `field!=value`; a null value tests for non-emptiness instead.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Ge, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Le, value)
    }

    /// Substring match: `fieldLIKEtext`.
    pub fn contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::compare(field, Operator::Like, text.into())
    }

    pub fn not_contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::compare(field, Operator::NotLike, text.into())
    }

    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::compare(field, Operator::StartsWith, prefix.into())
    }

    pub fn ends_with(field: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::compare(field, Operator::EndsWith, suffix.into())
    }

    /// Membership: `fieldINa,b,c`.
    pub fn is_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::condition(field, Operator::In, Operand::Many(values))
    }

    pub fn not_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::condition(field, Operator::NotIn, Operand::Many(values))
    }

    /// Inclusive range: `fieldBETWEENlow@high`.
    pub fn between(
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::condition(field, Operator::Between, Operand::Range(low.into(), high.into()))
    }

    pub fn is_empty(field: impl Into<String>) -> Self {
        Self::condition(field, Operator::IsEmpty, Operand::None)
    }

    pub fn is_not_empty(field: impl Into<String>) -> Self {
        Self::condition(field, Operator::IsNotEmpty, Operand::None)
    }

    /// Groups filters that must all match.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::All(filters.into_iter().collect())
    }

    /// Groups filters of which at least one must match.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Any(filters.into_iter().collect())
    }

    pub fn raw(query: impl Into<String>) -> Self {
        Filter::Raw(query.into())
    }

    /// Adds `other` to this `All` group, or starts one.
    pub fn and_also(self, other: Filter) -> Self {
        if let Filter::All(mut members) = self {
            members.push(other);
            return Filter::All(members);
        }
        Filter::All(vec![self, other])
    }

    /// Adds `other` to this `Any` group, or starts one.
    pub fn or_else(self, other: Filter) -> Self {
        if let Filter::Any(mut members) = self {
            members.push(other);
            return Filter::Any(members);
        }
        Filter::Any(vec![self, other])
    }

    /// Returns `true` if this filter is, or contains, an `All` group.
    pub(crate) fn has_all_group(&self) -> bool {
        match self {
            Filter::All(_) => true,
            Filter::Any(members) => members.iter().any(Filter::has_all_group),
            Filter::Condition(_) | Filter::Raw(_) => false,
        }
    }
}

impl From<Condition> for Filter {
    fn from(condition: Condition) -> Self {
        Filter::Condition(condition)
    }
}
