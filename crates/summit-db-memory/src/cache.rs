//! Dashmap-backed announcement cache.

use async_trait::async_trait;
use dashmap::DashMap;
use summit_storage::AnnouncementCache;

/// In-process string cache with no expiry.
///
/// Background jobs own the lifecycle of every entry: they overwrite on
/// recompute and delete when the entry no longer applies.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnouncementCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("announcement").await, None);

        cache.set("announcement", "nearly sold out".to_string()).await;
        assert_eq!(
            cache.get("announcement").await.as_deref(),
            Some("nearly sold out")
        );

        cache.set("announcement", "updated".to_string()).await;
        assert_eq!(cache.get("announcement").await.as_deref(), Some("updated"));

        cache.delete("announcement").await;
        assert_eq!(cache.get("announcement").await, None);
        // Deleting an absent key is a no-op
        cache.delete("announcement").await;
    }
}
