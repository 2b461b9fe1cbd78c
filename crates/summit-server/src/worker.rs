//! Background job dispatch over an in-process channel.
//!
//! Producers hand typed [`JobTask`] records to the dispatcher and move
//! on; a small worker pool consumes the queue and runs the jobs. A job
//! failure is logged and dropped, never propagated to the request that
//! enqueued it.

use std::sync::Arc;

use summit_storage::{
    DynAnnouncementCache, DynEntityStore, DynTaskDispatcher, JobTask, TaskDispatcher,
};
use tokio::sync::{Mutex, mpsc};

use crate::jobs;

/// Dispatcher backed by an unbounded mpsc channel.
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<JobTask>,
}

impl TaskDispatcher for ChannelDispatcher {
    fn enqueue(&self, task: JobTask) {
        tracing::debug!(?task, "job enqueued");
        if self.tx.send(task).is_err() {
            // Workers are gone; the write that triggered this already
            // succeeded, so dropping the task is the contract.
            tracing::error!("job workers unavailable; task dropped");
        }
    }
}

/// Starts `workers` consumer tasks and returns the shared dispatcher.
pub fn spawn_dispatcher(
    store: DynEntityStore,
    cache: DynAnnouncementCache,
    workers: usize,
) -> DynTaskDispatcher {
    let (tx, rx) = mpsc::unbounded_channel();
    let rx = Arc::new(Mutex::new(rx));
    for worker in 0..workers {
        let rx = Arc::clone(&rx);
        let store = store.clone();
        let cache = cache.clone();
        tokio::spawn(async move {
            loop {
                let task = { rx.lock().await.recv().await };
                let Some(task) = task else {
                    tracing::debug!(worker, "job queue closed; worker exiting");
                    break;
                };
                run_task(store.as_ref(), cache.as_ref(), task).await;
            }
        });
    }
    Arc::new(ChannelDispatcher { tx })
}

async fn run_task(
    store: &dyn summit_storage::EntityStore,
    cache: &dyn summit_storage::AnnouncementCache,
    task: JobTask,
) {
    let result = match &task {
        JobTask::RefreshAnnouncement => jobs::refresh_announcement(store, cache)
            .await
            .map(|_| ()),
        JobTask::RefreshFeaturedSpeaker {
            conference,
            speaker,
        } => jobs::refresh_featured_speaker(store, cache, conference, speaker).await,
    };
    if let Err(error) = result {
        tracing::error!(?task, %error, "background job failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::{Conference, ConferenceKey, Entity, ProfileKey};
    use summit_db_memory::{InMemoryStore, MemoryCache};
    use summit_storage::EntityStore;
    use tokio::time::{Duration, sleep};

    #[tokio::test]
    async fn test_dispatched_job_runs() {
        let store: DynEntityStore = Arc::new(InMemoryStore::new());
        let cache: DynAnnouncementCache = Arc::new(MemoryCache::new());
        let mut conf = Conference::new(ConferenceKey::new(ProfileKey::new("alice"), 1), "Tiny");
        conf.max_attendees = 5;
        conf.seats_available = 2;
        store.put(Entity::from(conf)).await.unwrap();

        let dispatcher = spawn_dispatcher(store.clone(), cache.clone(), 1);
        dispatcher.enqueue(JobTask::RefreshAnnouncement);

        // The queue is eventually consistent; poll briefly.
        for _ in 0..50 {
            if cache.get(jobs::RECENT_ANNOUNCEMENTS_KEY).await.is_some() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        let announcement = cache.get(jobs::RECENT_ANNOUNCEMENTS_KEY).await;
        assert!(announcement.unwrap().contains("Tiny"));
    }

    #[tokio::test]
    async fn test_failed_job_does_not_kill_worker() {
        let store: DynEntityStore = Arc::new(InMemoryStore::new());
        let cache: DynAnnouncementCache = Arc::new(MemoryCache::new());
        let dispatcher = spawn_dispatcher(store.clone(), cache.clone(), 1);

        // Malformed token: the job fails, is logged and dropped.
        dispatcher.enqueue(JobTask::RefreshFeaturedSpeaker {
            conference: "garbage".into(),
            speaker: "Alice".into(),
        });
        // The worker must still process subsequent tasks.
        dispatcher.enqueue(JobTask::RefreshAnnouncement);
        sleep(Duration::from_millis(100)).await;
        // No conferences at all: the announcement entry stays absent.
        assert_eq!(cache.get(jobs::RECENT_ANNOUNCEMENTS_KEY).await, None);
    }
}
