//! Query and job types used by the storage traits.

use std::cmp::Ordering;

use summit_core::{Entity, EntityKey, FieldValue};

/// Comparison operator applied by a [`PropertyFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Returns `true` for every operator except equality.
    ///
    /// Inequality operators constrain query plans: only one property per
    /// query may carry one (see the filter builder in `summit-query`).
    #[must_use]
    pub fn is_inequality(&self) -> bool {
        !matches!(self, Self::Eq)
    }

    /// Evaluates the operator against an entity's property value.
    ///
    /// A missing or shape-mismatched property never matches, except for
    /// `Ne` where a present, comparable value different from the operand
    /// is required as well - absent properties are not "not equal", they
    /// are unindexed.
    #[must_use]
    pub fn matches(&self, field: Option<&FieldValue>, operand: &FieldValue) -> bool {
        let Some(field) = field else {
            return false;
        };
        match self {
            Self::Eq => field.equals(operand),
            Self::Ne => match field {
                FieldValue::StrList(_) => !field.equals(operand),
                _ => field
                    .compare(operand)
                    .map(|o| o != Ordering::Equal)
                    .unwrap_or(false),
            },
            Self::Gt => field.compare(operand) == Some(Ordering::Greater),
            Self::Ge => matches!(
                field.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt => field.compare(operand) == Some(Ordering::Less),
            Self::Le => matches!(
                field.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        };
        f.write_str(symbol)
    }
}

/// A single property constraint; query filters form a conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    pub property: String,
    pub op: CompareOp,
    pub value: FieldValue,
}

impl PropertyFilter {
    pub fn new(property: impl Into<String>, op: CompareOp, value: FieldValue) -> Self {
        Self {
            property: property.into(),
            op,
            value,
        }
    }

    /// Checks this filter against an entity.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.op
            .matches(entity.field(&self.property).as_ref(), &self.value)
    }
}

/// A sort key for query results; keys apply in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub property: String,
    pub descending: bool,
}

impl SortKey {
    pub fn new(property: impl Into<String>, descending: bool) -> Self {
        Self {
            property: property.into(),
            descending,
        }
    }

    /// Creates an ascending sort key.
    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, false)
    }

    /// Creates a descending sort key.
    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, true)
    }
}

/// An executable query plan against the entity store.
///
/// Filters are applied as a conjunction; an ancestor restricts results to
/// descendants of the given key; sort keys apply in order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityQuery {
    pub kind: String,
    pub ancestor: Option<EntityKey>,
    pub filters: Vec<PropertyFilter>,
    pub order: Vec<SortKey>,
    pub limit: Option<usize>,
}

impl EntityQuery {
    /// Creates a query over all entities of a kind.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ancestor: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Restricts results to descendants of the given key.
    #[must_use]
    pub fn with_ancestor(mut self, ancestor: impl Into<EntityKey>) -> Self {
        self.ancestor = Some(ancestor.into());
        self
    }

    /// Adds a property filter.
    #[must_use]
    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds a sort key.
    #[must_use]
    pub fn with_order(mut self, key: SortKey) -> Self {
        self.order.push(key);
        self
    }

    /// Caps the number of returned entities.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks kind, ancestor and all filters against an entity.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        if entity.kind() != self.kind {
            return false;
        }
        if let Some(ancestor) = &self.ancestor {
            let prefix = format!("{}/", ancestor.path());
            if !entity.key().path().starts_with(&prefix) {
                return false;
            }
        }
        self.filters.iter().all(|f| f.matches(entity))
    }

    /// Comparator implementing this query's sort keys in sequence.
    ///
    /// Entities missing a sort property order before those that have it;
    /// ties fall through to the next key.
    #[must_use]
    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        for key in &self.order {
            let va = a.field(&key.property);
            let vb = b.field(&key.property);
            let ordering = match (&va, &vb) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
            };
            let ordering = if key.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// A typed background job record handed to the [`crate::TaskDispatcher`].
///
/// Producers enqueue these after writes; a worker pool consumes them.
/// Delivery is best-effort, at-least-once, unordered.
#[derive(Debug, Clone, PartialEq)]
pub enum JobTask {
    /// Rebuild the near-sold-out announcement cache entry.
    RefreshAnnouncement,
    /// Re-evaluate the featured speaker of one conference.
    RefreshFeaturedSpeaker {
        /// Websafe token of the owning conference.
        conference: String,
        /// Speaker of the just-created session.
        speaker: String,
    },
}
