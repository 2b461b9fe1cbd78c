//! Core storage traits.

use async_trait::async_trait;
use summit_core::{Entity, EntityKey};

use crate::error::StorageError;
use crate::types::{EntityQuery, JobTask};

/// Durable entity storage with hierarchical keys and transactions.
///
/// All methods operate on [`Entity`] values addressed by [`EntityKey`].
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetches an entity by key, `Ok(None)` when absent.
    async fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StorageError>;

    /// Creates or replaces an entity at its own key.
    async fn put(&self, entity: Entity) -> Result<(), StorageError>;

    /// Deletes an entity by key. Deleting an absent key is not an error.
    async fn delete(&self, key: &EntityKey) -> Result<(), StorageError>;

    /// Runs a query and returns matching entities, sorted and limited
    /// per the plan.
    async fn query(&self, query: &EntityQuery) -> Result<Vec<Entity>, StorageError>;

    /// Allocates a numeric id unique under the given parent key.
    async fn allocate_id(&self, parent: &EntityKey) -> Result<u64, StorageError>;

    /// Opens a transaction. A cross-group transaction may touch entities
    /// under multiple root keys; a plain one is confined to a single
    /// entity group and fails at commit otherwise.
    async fn begin_transaction(
        &self,
        cross_group: bool,
    ) -> Result<Box<dyn StoreTransaction>, StorageError>;

    /// Human-readable backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// A storage transaction with snapshot reads and buffered writes.
///
/// Reads record the version of every entity they observe; writes are
/// buffered until [`commit`](Self::commit). Commit fails with
/// [`StorageError::Contention`] when any observed entity changed since it
/// was read, in which case the caller retries with a fresh transaction.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Reads an entity inside the transaction, recording its version.
    async fn get(&mut self, key: &EntityKey) -> Result<Option<Entity>, StorageError>;

    /// Buffers an entity write.
    fn put(&mut self, entity: Entity);

    /// Buffers an entity deletion.
    fn delete(&mut self, key: &EntityKey);

    /// Atomically applies buffered writes after validating reads.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discards the transaction without applying anything.
    fn rollback(self: Box<Self>);
}

/// Ephemeral string cache for precomputed announcements.
///
/// Entries carry no expiry; jobs overwrite or delete them explicitly.
#[async_trait]
pub trait AnnouncementCache: Send + Sync {
    /// Fetches a cached value, `None` when absent.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores a value, replacing any existing entry.
    async fn set(&self, key: &str, value: String);

    /// Removes an entry. Removing an absent key is a no-op.
    async fn delete(&self, key: &str);
}

/// Fire-and-forget background job queue.
///
/// Enqueueing never blocks request handling and never fails the caller;
/// a dispatcher that cannot deliver logs and drops the task.
pub trait TaskDispatcher: Send + Sync {
    fn enqueue(&self, task: JobTask);
}
