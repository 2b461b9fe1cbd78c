//! Shared application state.

use std::sync::Arc;

use summit_db_memory::{InMemoryStore, MemoryCache};
use summit_storage::{DynAnnouncementCache, DynEntityStore, DynTaskDispatcher};

use crate::worker;

/// Handles to the store, cache and job dispatcher shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: DynEntityStore,
    pub cache: DynAnnouncementCache,
    pub dispatcher: DynTaskDispatcher,
}

impl AppState {
    /// Wires up the in-memory backend with a running worker pool.
    pub fn in_memory(workers: usize) -> Self {
        let store: DynEntityStore = Arc::new(InMemoryStore::new());
        let cache: DynAnnouncementCache = Arc::new(MemoryCache::new());
        let dispatcher = worker::spawn_dispatcher(store.clone(), cache.clone(), workers);
        Self {
            store,
            cache,
            dispatcher,
        }
    }
}
