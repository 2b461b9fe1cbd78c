//! # summit-query
//!
//! Translates user-supplied filter triples into validated query plans
//! against the entity store.
//!
//! Clients send filters as `(field, operator, value)` string triples.
//! [`build_conference_query`] validates the tokens, coerces numeric
//! values, enforces the single-inequality-field rule and produces an
//! [`EntityQuery`](summit_storage::EntityQuery) ordered by the
//! inequality field (if any) and then by name.

pub mod builder;
pub mod error;

pub use builder::{FilterSpec, build_conference_query};
pub use error::QueryError;
