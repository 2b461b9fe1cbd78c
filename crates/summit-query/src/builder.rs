//! Conference filter parsing and query planning.

use serde::{Deserialize, Serialize};
use summit_core::FieldValue;
use summit_core::conference::properties;
use summit_storage::{CompareOp, EntityQuery, PropertyFilter, SortKey};

use crate::error::QueryError;

/// One user-supplied filter triple, as it arrives on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterSpec {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Shape a filter value must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Text,
    Numeric,
}

/// Resolves a field token to its stored property name and value type.
fn resolve_field(token: &str) -> Result<(&'static str, FieldType), QueryError> {
    match token {
        "CITY" => Ok((properties::CITY, FieldType::Text)),
        "TOPIC" => Ok((properties::TOPICS, FieldType::Text)),
        "MONTH" => Ok((properties::MONTH, FieldType::Numeric)),
        "MAX_ATTENDEES" => Ok((properties::MAX_ATTENDEES, FieldType::Numeric)),
        other => Err(QueryError::invalid_filter(format!(
            "unknown field '{other}'"
        ))),
    }
}

/// Resolves an operator token.
fn resolve_operator(token: &str) -> Result<CompareOp, QueryError> {
    match token {
        "EQ" => Ok(CompareOp::Eq),
        "GT" => Ok(CompareOp::Gt),
        "GTEQ" => Ok(CompareOp::Ge),
        "LT" => Ok(CompareOp::Lt),
        "LTEQ" => Ok(CompareOp::Le),
        "NE" => Ok(CompareOp::Ne),
        other => Err(QueryError::invalid_filter(format!(
            "unknown operator '{other}'"
        ))),
    }
}

/// Coerces the raw value string to the field's type.
fn coerce_value(raw: &str, field_type: FieldType, field: &str) -> Result<FieldValue, QueryError> {
    match field_type {
        FieldType::Text => Ok(FieldValue::str(raw)),
        FieldType::Numeric => raw.parse::<i64>().map(FieldValue::Int).map_err(|_| {
            QueryError::invalid_filter(format!("non-numeric value '{raw}' for field '{field}'"))
        }),
    }
}

/// Builds an executable conference query from user filters.
///
/// Validates every triple before anything is applied. At most one
/// distinct field may carry a non-equality operator; results order by
/// that field first and by name second, so range scans stay on a single
/// sort key. With no filters the plan is a full kind scan ordered by
/// name.
pub fn build_conference_query(filters: &[FilterSpec]) -> Result<EntityQuery, QueryError> {
    let mut query = EntityQuery::kind(summit_core::CONFERENCE_KIND);
    let mut inequality_field: Option<&'static str> = None;

    for spec in filters {
        let (property, field_type) = resolve_field(&spec.field)?;
        let op = resolve_operator(&spec.operator)?;
        let value = coerce_value(&spec.value, field_type, property)?;

        if op.is_inequality() {
            match inequality_field {
                Some(existing) if existing != property => {
                    return Err(QueryError::unsupported_combination(existing, property));
                }
                _ => inequality_field = Some(property),
            }
        }
        query = query.with_filter(PropertyFilter::new(property, op, value));
    }

    // The inequality field must be the primary sort key.
    if let Some(field) = inequality_field {
        query = query.with_order(SortKey::asc(field));
    }
    query = query.with_order(SortKey::asc(properties::NAME));
    Ok(query)
}
