//! Property values exposed by entities for filtering and ordering.

use std::cmp::Ordering;

/// A single queryable property value.
///
/// Entities expose their filterable/sortable properties as `FieldValue`s
/// through [`crate::Entity::field`]; the storage layer compares them when
/// executing queries. Repeated string properties (e.g. conference topics)
/// use [`FieldValue::StrList`] with membership semantics for equality.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    StrList(Vec<String>),
}

impl FieldValue {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn int(value: impl Into<i64>) -> Self {
        Self::Int(value.into())
    }

    /// Ordering between two values of the same shape.
    ///
    /// Returns `None` for mismatched shapes or list values, which have no
    /// meaningful order.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality with membership semantics for repeated properties.
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::StrList(items), Self::Str(value)) => items.iter().any(|i| i == value),
            (Self::Str(value), Self::StrList(items)) => items.iter().any(|i| i == value),
            _ => self == other,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
