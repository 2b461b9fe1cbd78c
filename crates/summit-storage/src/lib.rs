//! # summit-storage
//!
//! Storage abstraction layer for the Summit server.
//!
//! This crate defines the traits and types that the external collaborators
//! must implement. It contains no implementations - those are provided by
//! separate crates (`summit-db-memory` ships the in-memory backend).
//!
//! ## Overview
//!
//! Three collaborators are abstracted here:
//! - [`EntityStore`]: durable entity storage with hierarchical keys,
//!   queries and cross-group transactions
//! - [`AnnouncementCache`]: ephemeral key-value cache for precomputed
//!   announcement strings
//! - [`TaskDispatcher`]: fire-and-forget background job queue
//!
//! ## Example
//!
//! ```ignore
//! use summit_storage::{EntityStore, EntityQuery, PropertyFilter, CompareOp};
//! use summit_core::FieldValue;
//!
//! async fn conferences_in(store: &dyn EntityStore, city: &str)
//!     -> Result<Vec<summit_core::Entity>, summit_storage::StorageError>
//! {
//!     let query = EntityQuery::kind("Conference")
//!         .with_filter(PropertyFilter::new("city", CompareOp::Eq, FieldValue::str(city)))
//!         .with_order(SortKey::asc("name"));
//!     store.query(&query).await
//! }
//! ```

pub mod error;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use traits::{AnnouncementCache, EntityStore, StoreTransaction, TaskDispatcher};
pub use types::{CompareOp, EntityQuery, JobTask, PropertyFilter, SortKey};

/// Type alias for a shareable EntityStore instance.
pub type DynEntityStore = std::sync::Arc<dyn EntityStore>;

/// Type alias for a shareable AnnouncementCache instance.
pub type DynAnnouncementCache = std::sync::Arc<dyn AnnouncementCache>;

/// Type alias for a shareable TaskDispatcher instance.
pub type DynTaskDispatcher = std::sync::Arc<dyn TaskDispatcher>;

/// Upper bound on transaction attempts before contention is surfaced.
pub const TRANSACTION_RETRY_LIMIT: usize = 5;
