//! Encoded-query string generation.

use crate::api::query::Condition;
use crate::api::query::Direction;
use crate::api::query::Filter;
use crate::api::query::Operand;
use crate::api::query::Operator;
use crate::api::query::OrderBy;
use crate::error::Error;
use crate::model::Value;

/// Converts a `Filter` to an encoded query string.
///
/// `AND` joins with `^` and `OR` with `^OR`; since `OR` binds tighter, an
/// `OR` may sit under an `AND` but not the other way round. The one exception
/// is the top level, where an `OR` of `AND` groups is written as independent
/// queries joined with `^NQ`.
pub fn filter_to_query(filter: &Filter) -> Result<String, Error> {
    match filter {
        Filter::Any(filters) if filters.iter().any(Filter::has_all_group) => {
            let parts = filters
                .iter()
                .map(and_to_query)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join("^NQ"))
        }
        _ => and_to_query(filter),
    }
}

fn and_to_query(filter: &Filter) -> Result<String, Error> {
    match filter {
        Filter::All(filters) => {
            if filters.is_empty() {
                return Err(Error::invalid_usage("empty AND group"));
            }
            let parts = filters
                .iter()
                .map(and_to_query)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join("^"))
        }
        other => or_to_query(other),
    }
}

fn or_to_query(filter: &Filter) -> Result<String, Error> {
    match filter {
        Filter::Any(filters) => {
            if filters.is_empty() {
                return Err(Error::invalid_usage("empty OR group"));
            }
            let parts = filters
                .iter()
                .map(or_to_query)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join("^OR"))
        }
        Filter::All(_) => Err(Error::invalid_usage(
            "an AND group inside an OR is only expressible at the top level",
        )),
        Filter::Condition(condition) => condition_to_query(condition),
        Filter::Raw(raw) => Ok(raw.clone()),
    }
}

fn condition_to_query(condition: &Condition) -> Result<String, Error> {
    let Condition {
        field,
        operator,
        operand,
    } = condition;
    if field.is_empty() {
        return Err(Error::invalid_usage("condition has an empty field name"));
    }

    let operator = match (operator, operand) {
        (Operator::Eq, Operand::One(Value::Null)) => Operator::IsEmpty,
        (Operator::Ne, Operand::One(Value::Null)) => Operator::IsNotEmpty,
        (operator, _) => *operator,
    };

    let rendered = match (operator, operand) {
        (Operator::IsEmpty | Operator::IsNotEmpty, _) => String::new(),
        (Operator::In | Operator::NotIn, Operand::Many(values)) => join_values(values)?,
        (Operator::Between, Operand::Range(low, high)) => {
            format!("{}@{}", low.to_query_string(), high.to_query_string())
        }
        (Operator::In | Operator::NotIn | Operator::Between, _) => {
            return Err(Error::invalid_usage(format!(
                "{} on '{}' has the wrong kind of operand",
                operator, field
            )));
        }
        (_, Operand::One(value)) => value.to_query_string(),
        (_, _) => {
            return Err(Error::invalid_usage(format!(
                "{} on '{}' needs exactly one value",
                operator, field
            )));
        }
    };

    Ok(format!("{}{}{}", field, operator, rendered))
}

fn join_values(values: &[Value]) -> Result<String, Error> {
    if values.is_empty() {
        return Err(Error::invalid_usage("IN condition needs at least one value"));
    }
    Ok(values
        .iter()
        .map(Value::to_query_string)
        .collect::<Vec<_>>()
        .join(","))
}

/// Converts an `OrderBy` to encoded-query sort fragments.
///
/// Returns an empty string when no ordering is set.
pub fn order_to_query(order: &OrderBy) -> String {
    order
        .fields()
        .iter()
        .map(|(field, direction)| match direction {
            Direction::Asc => format!("ORDERBY{}", field),
            Direction::Desc => format!("ORDERBYDESC{}", field),
        })
        .collect::<Vec<_>>()
        .join("^")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_filters() {
        assert_eq!(
            filter_to_query(&Filter::eq("category", "network")).unwrap(),
            "category=network"
        );
        assert_eq!(filter_to_query(&Filter::gt("priority", 2)).unwrap(), "priority>2");
        assert_eq!(
            filter_to_query(&Filter::is_empty("assigned_to")).unwrap(),
            "assigned_toISEMPTY"
        );
        assert_eq!(
            filter_to_query(&Filter::ne("assigned_to", Value::Null)).unwrap(),
            "assigned_toISNOTEMPTY"
        );
    }

    #[test]
    fn test_string_operators() {
        assert_eq!(
            filter_to_query(&Filter::contains("short_description", "SAP")).unwrap(),
            "short_descriptionLIKESAP"
        );
        assert_eq!(
            filter_to_query(&Filter::not_contains("short_description", "SAP")).unwrap(),
            "short_descriptionNOT LIKESAP"
        );
        assert_eq!(
            filter_to_query(&Filter::starts_with("number", "INC")).unwrap(),
            "numberSTARTSWITHINC"
        );
    }

    #[test]
    fn test_membership_and_range() {
        assert_eq!(
            filter_to_query(&Filter::is_in("state", [1, 2, 3])).unwrap(),
            "stateIN1,2,3"
        );
        assert_eq!(
            filter_to_query(&Filter::between("priority", 1, 3)).unwrap(),
            "priorityBETWEEN1@3"
        );
        let empty: [i64; 0] = [];
        assert!(filter_to_query(&Filter::not_in("state", empty)).is_err());
    }

    #[test]
    fn test_or_binds_tighter_than_and() {
        let filter = Filter::and([
            Filter::or([Filter::eq("priority", 1), Filter::eq("priority", 2)]),
            Filter::eq("active", true),
        ]);
        assert_eq!(
            filter_to_query(&filter).unwrap(),
            "priority=1^ORpriority=2^active=true"
        );
    }

    #[test]
    fn test_top_level_or_of_and_groups() {
        let filter = Filter::or([
            Filter::and([Filter::eq("active", true), Filter::eq("priority", 1)]),
            Filter::eq("state", 6),
        ]);
        assert_eq!(
            filter_to_query(&filter).unwrap(),
            "active=true^priority=1^NQstate=6"
        );
    }

    #[test]
    fn test_nested_and_under_or_is_rejected() {
        let filter = Filter::and([
            Filter::eq("active", true),
            Filter::or([
                Filter::and([Filter::eq("a", 1), Filter::eq("b", 2)]),
                Filter::eq("c", 3),
            ]),
        ]);
        assert!(filter_to_query(&filter).unwrap_err().is_invalid_usage());
    }

    #[test]
    fn test_mismatched_operand_is_rejected() {
        let filter = Filter::condition("state", Operator::In, Operand::One(Value::Int(1)));
        assert!(filter_to_query(&filter).unwrap_err().is_invalid_usage());

        let filter = Filter::condition("state", Operator::Gt, Operand::None);
        assert!(filter_to_query(&filter).unwrap_err().is_invalid_usage());
    }

    #[test]
    fn test_raw_passes_through() {
        let filter = Filter::raw("active=true^ORpriority=1").and_also(Filter::eq("state", 2));
        assert_eq!(
            filter_to_query(&filter).unwrap(),
            "active=true^ORpriority=1^state=2"
        );
    }

    #[test]
    fn test_empty_groups_and_fields_are_rejected() {
        assert!(filter_to_query(&Filter::and([])).is_err());
        assert!(filter_to_query(&Filter::or([])).is_err());
        assert!(filter_to_query(&Filter::eq("", 1)).is_err());
    }

    #[test]
    fn test_order_by() {
        let order = OrderBy::asc("category").then_desc("created_on");
        assert_eq!(order_to_query(&order), "ORDERBYcategory^ORDERBYDESCcreated_on");
        assert_eq!(order_to_query(&OrderBy::default()), "");
    }
}
