//! Lock-free in-memory entity store with optimistic transactions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use summit_core::{Entity, EntityKey};
use summit_storage::{EntityQuery, EntityStore, StorageError, StoreTransaction};
use tokio::sync::Mutex;

/// An entity together with the version stamp of its last write.
///
/// Versions come from a store-wide counter, so any two writes are
/// distinguishable even when they store equal entity values.
#[derive(Debug, Clone)]
struct VersionedEntity {
    version: u64,
    entity: Entity,
}

/// In-memory entity store backed by a papaya lock-free map.
///
/// Plain reads and writes never block. Transactions are optimistic: reads
/// record version stamps, writes are buffered, and commit validates every
/// recorded read under a single commit lock before applying the buffer.
#[derive(Debug)]
pub struct InMemoryStore {
    /// Canonical key path to versioned entity.
    data: Arc<PapayaHashMap<String, VersionedEntity>>,
    /// Store-wide write version counter.
    version_counter: Arc<AtomicU64>,
    /// Counter backing `allocate_id`.
    id_counter: AtomicU64,
    /// Serialises transaction commits; plain writes bypass it.
    commit_lock: Arc<Mutex<()>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            version_counter: Arc::new(AtomicU64::new(1)),
            id_counter: AtomicU64::new(1),
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    fn next_version(&self) -> u64 {
        self.version_counter.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StorageError> {
        let guard = self.data.pin();
        Ok(guard.get(&key.path()).map(|v| v.entity.clone()))
    }

    async fn put(&self, entity: Entity) -> Result<(), StorageError> {
        let path = entity.key().path();
        let version = self.next_version();
        let guard = self.data.pin();
        guard.insert(path, VersionedEntity { version, entity });
        Ok(())
    }

    async fn delete(&self, key: &EntityKey) -> Result<(), StorageError> {
        let guard = self.data.pin();
        guard.remove(&key.path());
        Ok(())
    }

    async fn query(&self, query: &EntityQuery) -> Result<Vec<Entity>, StorageError> {
        let guard = self.data.pin();
        let mut results: Vec<Entity> = guard
            .iter()
            .filter(|(_, v)| query.matches(&v.entity))
            .map(|(_, v)| v.entity.clone())
            .collect();
        results.sort_by(|a, b| query.compare(a, b));
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        tracing::trace!(
            kind = %query.kind,
            matched = results.len(),
            "executed entity query"
        );
        Ok(results)
    }

    async fn allocate_id(&self, _parent: &EntityKey) -> Result<u64, StorageError> {
        // A store-wide counter is trivially unique under any parent.
        Ok(self.id_counter.fetch_add(1, Ordering::SeqCst))
    }

    async fn begin_transaction(
        &self,
        cross_group: bool,
    ) -> Result<Box<dyn StoreTransaction>, StorageError> {
        Ok(Box::new(MemoryTransaction {
            data: Arc::clone(&self.data),
            version_counter: Arc::clone(&self.version_counter),
            commit_lock: Arc::clone(&self.commit_lock),
            cross_group,
            reads: HashMap::new(),
            writes: HashMap::new(),
            roots: HashSet::new(),
        }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// An optimistic transaction over an [`InMemoryStore`].
///
/// Reads record the version stamp first observed for each path (`None`
/// when the entity was absent); writes and deletes are buffered by path.
/// Commit fails with [`StorageError::Contention`] when any recorded read
/// no longer matches the live map.
pub struct MemoryTransaction {
    data: Arc<PapayaHashMap<String, VersionedEntity>>,
    version_counter: Arc<AtomicU64>,
    commit_lock: Arc<Mutex<()>>,
    cross_group: bool,
    /// Path to first-observed version, `None` for observed-absent.
    reads: HashMap<String, Option<u64>>,
    /// Path to buffered write, `None` for a buffered delete.
    writes: HashMap<String, Option<Entity>>,
    /// Root paths of every touched entity group.
    roots: HashSet<String>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn get(&mut self, key: &EntityKey) -> Result<Option<Entity>, StorageError> {
        let path = key.path();
        self.roots.insert(key.root_path());
        // Reads see this transaction's own buffered writes.
        if let Some(buffered) = self.writes.get(&path) {
            return Ok(buffered.clone());
        }
        let guard = self.data.pin();
        match guard.get(&path) {
            Some(v) => {
                self.reads.entry(path).or_insert(Some(v.version));
                Ok(Some(v.entity.clone()))
            }
            None => {
                self.reads.entry(path).or_insert(None);
                Ok(None)
            }
        }
    }

    fn put(&mut self, entity: Entity) {
        let key = entity.key();
        self.roots.insert(key.root_path());
        self.writes.insert(key.path(), Some(entity));
    }

    fn delete(&mut self, key: &EntityKey) {
        self.roots.insert(key.root_path());
        self.writes.insert(key.path(), None);
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        if !self.cross_group && self.roots.len() > 1 {
            return Err(StorageError::transaction_error(format!(
                "transaction spans {} entity groups but was not opened cross-group",
                self.roots.len()
            )));
        }
        let Self {
            data,
            version_counter,
            commit_lock,
            reads,
            writes,
            ..
        } = *self;
        let _guard = commit_lock.lock().await;
        let map = data.pin();
        for (path, observed) in &reads {
            let current = map.get(path).map(|v| v.version);
            if current != *observed {
                tracing::debug!(path = %path, "transaction read validation failed");
                return Err(StorageError::contention(path.clone()));
            }
        }
        for (path, write) in writes {
            match write {
                Some(entity) => {
                    let version = version_counter.fetch_add(1, Ordering::SeqCst);
                    map.insert(path, VersionedEntity { version, entity });
                }
                None => {
                    map.remove(&path);
                }
            }
        }
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        // Nothing touched the live map; dropping the buffers is enough.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::conference::properties;
    use summit_core::{Conference, ConferenceKey, FieldValue, ProfileKey};
    use summit_storage::{CompareOp, PropertyFilter, SortKey};

    fn conference(owner: &str, id: u64, name: &str, city: &str) -> Conference {
        let mut conf = Conference::new(ConferenceKey::new(ProfileKey::new(owner), id), name);
        conf.city = city.to_string();
        conf
    }

    #[tokio::test]
    async fn test_put_get_delete_round_trip() {
        let store = InMemoryStore::new();
        let conf = conference("alice", 1, "RustConf", "London");
        let key = EntityKey::from(conf.key().clone());

        store.put(Entity::from(conf.clone())).await.unwrap();
        let fetched = store.get(&key).await.unwrap().unwrap();
        assert_eq!(fetched.as_conference(), Some(&conf));

        store.delete(&key).await.unwrap();
        assert!(store.get(&key).await.unwrap().is_none());
        // Deleting again is a no-op
        store.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_query_filters_sorts_and_limits() {
        let store = InMemoryStore::new();
        store
            .put(Entity::from(conference("alice", 1, "Charlie", "London")))
            .await
            .unwrap();
        store
            .put(Entity::from(conference("alice", 2, "Alpha", "London")))
            .await
            .unwrap();
        store
            .put(Entity::from(conference("bob", 3, "Beta", "Paris")))
            .await
            .unwrap();

        let query = EntityQuery::kind("Conference")
            .with_filter(PropertyFilter::new(
                properties::CITY,
                CompareOp::Eq,
                FieldValue::str("London"),
            ))
            .with_order(SortKey::asc(properties::NAME));
        let results = store.query(&query).await.unwrap();
        let names: Vec<&str> = results
            .iter()
            .filter_map(|e| e.as_conference())
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Charlie"]);

        let limited = store.query(&query.clone().with_limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_query_with_ancestor() {
        let store = InMemoryStore::new();
        store
            .put(Entity::from(conference("alice", 1, "Alpha", "London")))
            .await
            .unwrap();
        store
            .put(Entity::from(conference("bob", 2, "Beta", "London")))
            .await
            .unwrap();

        let query = EntityQuery::kind("Conference").with_ancestor(ProfileKey::new("alice"));
        let results = store.query(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_conference().map(|c| c.name.as_str()), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_allocate_id_is_unique() {
        let store = InMemoryStore::new();
        let parent = EntityKey::from(ProfileKey::new("alice"));
        let a = store.allocate_id(&parent).await.unwrap();
        let b = store.allocate_id(&parent).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_transaction_commit_applies_buffered_writes() {
        let store = InMemoryStore::new();
        let conf = conference("alice", 1, "RustConf", "London");
        let key = EntityKey::from(conf.key().clone());

        let mut txn = store.begin_transaction(false).await.unwrap();
        assert!(txn.get(&key).await.unwrap().is_none());
        txn.put(Entity::from(conf.clone()));
        // Buffered writes are invisible outside the transaction
        assert!(store.get(&key).await.unwrap().is_none());
        // but visible to the transaction's own reads.
        assert!(txn.get(&key).await.unwrap().is_some());
        txn.commit().await.unwrap();

        assert!(store.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_transaction_detects_contention() {
        let store = InMemoryStore::new();
        let conf = conference("alice", 1, "RustConf", "London");
        let key = EntityKey::from(conf.key().clone());
        store.put(Entity::from(conf.clone())).await.unwrap();

        let mut txn = store.begin_transaction(false).await.unwrap();
        let read = txn.get(&key).await.unwrap().unwrap();

        // Concurrent write after the transactional read
        let mut changed = read.into_conference().unwrap();
        changed.city = "Paris".to_string();
        store.put(Entity::from(changed)).await.unwrap();

        txn.put(Entity::from(conference("alice", 1, "RustConf", "Berlin")));
        let err = txn.commit().await.unwrap_err();
        assert!(err.is_contention());

        // The concurrent write survives
        let current = store.get(&key).await.unwrap().unwrap();
        assert_eq!(current.as_conference().map(|c| c.city.as_str()), Some("Paris"));
    }

    #[tokio::test]
    async fn test_plain_transaction_rejects_multiple_groups() {
        let store = InMemoryStore::new();
        let mut txn = store.begin_transaction(false).await.unwrap();
        txn.put(Entity::from(conference("alice", 1, "Alpha", "London")));
        txn.put(Entity::from(conference("bob", 2, "Beta", "Paris")));
        let err = txn.commit().await.unwrap_err();
        assert!(matches!(err, StorageError::TransactionError { .. }));

        let mut txn = store.begin_transaction(true).await.unwrap();
        txn.put(Entity::from(conference("alice", 1, "Alpha", "London")));
        txn.put(Entity::from(conference("bob", 2, "Beta", "Paris")));
        txn.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_leaves_store_untouched() {
        let store = InMemoryStore::new();
        let conf = conference("alice", 1, "RustConf", "London");
        let key = EntityKey::from(conf.key().clone());

        let mut txn = store.begin_transaction(false).await.unwrap();
        txn.put(Entity::from(conf));
        txn.rollback();

        assert!(store.get(&key).await.unwrap().is_none());
    }
}
