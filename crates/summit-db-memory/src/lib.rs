//! # summit-db-memory
//!
//! In-memory implementations of the `summit-storage` traits.
//!
//! [`InMemoryStore`] keeps entities in a lock-free papaya map with
//! per-entity version counters; transactions validate their reads at
//! commit under a single commit lock, so writers never block readers.
//! [`MemoryCache`] is a dashmap-backed announcement cache.
//!
//! Both are intended for single-process deployments and tests; nothing
//! survives a restart.

pub mod cache;
pub mod store;

pub use cache::MemoryCache;
pub use store::{InMemoryStore, MemoryTransaction};
