//! Cache-refresh background jobs.
//!
//! Both jobs are idempotent over a fixed store state and run decoupled
//! from the request that triggered them; their failures are logged by the
//! worker and never surface to the caller.

use summit_core::conference::properties;
use summit_core::{EntityKey, FieldValue};
use summit_storage::{
    AnnouncementCache, CompareOp, EntityQuery, EntityStore, PropertyFilter, SortKey,
};

/// Cache key of the near-sold-out announcement.
pub const RECENT_ANNOUNCEMENTS_KEY: &str = "RECENT_ANNOUNCEMENTS";
/// Cache key of the featured speaker announcement.
pub const FEATURED_SPEAKER_KEY: &str = "FEATURED SPEAKER";

/// A conference is near-sold-out with 1..=5 seats remaining.
pub const NEAR_SOLD_OUT_MAX_SEATS: i64 = 5;
/// A speaker is featured from this many sessions in one conference.
pub const FEATURED_SPEAKER_MIN_SESSIONS: usize = 2;

/// Rebuilds the near-sold-out announcement cache entry.
///
/// Scans conferences with `0 < seatsAvailable <= 5` and writes one
/// comma-joined announcement, or deletes the entry when no conference
/// qualifies (absence is the canonical "no announcement" state). Results
/// are ordered by name so reruns over identical data produce the
/// identical cache value.
///
/// Returns the announcement that was written, if any.
pub async fn refresh_announcement(
    store: &dyn EntityStore,
    cache: &dyn AnnouncementCache,
) -> anyhow::Result<Option<String>> {
    let query = EntityQuery::kind(summit_core::CONFERENCE_KIND)
        .with_filter(PropertyFilter::new(
            properties::SEATS_AVAILABLE,
            CompareOp::Gt,
            FieldValue::Int(0),
        ))
        .with_filter(PropertyFilter::new(
            properties::SEATS_AVAILABLE,
            CompareOp::Le,
            FieldValue::Int(NEAR_SOLD_OUT_MAX_SEATS),
        ))
        .with_order(SortKey::asc(properties::NAME));
    let nearly_sold_out = store.query(&query).await?;

    if nearly_sold_out.is_empty() {
        cache.delete(RECENT_ANNOUNCEMENTS_KEY).await;
        tracing::debug!("no nearly sold out conferences; announcement cleared");
        return Ok(None);
    }

    let names: Vec<&str> = nearly_sold_out
        .iter()
        .filter_map(|e| e.as_conference())
        .map(|c| c.name.as_str())
        .collect();
    let announcement = format!(
        "Last chance to attend! The following conferences are nearly sold out: {}",
        names.join(", ")
    );
    cache
        .set(RECENT_ANNOUNCEMENTS_KEY, announcement.clone())
        .await;
    tracing::info!(conferences = names.len(), "announcement cache refreshed");
    Ok(Some(announcement))
}

/// Re-evaluates the featured speaker of one conference.
///
/// Counts the conference's sessions held by `speaker`; at two or more the
/// cache entry is overwritten. Below the threshold nothing is written, so
/// a previously featured speaker persists until superseded.
pub async fn refresh_featured_speaker(
    store: &dyn EntityStore,
    cache: &dyn AnnouncementCache,
    conference_token: &str,
    speaker: &str,
) -> anyhow::Result<()> {
    let key = EntityKey::parse_websafe(conference_token)?;
    let conference_key = key
        .as_conference()
        .ok_or_else(|| anyhow::anyhow!("not a conference key: {key}"))?;

    let query = EntityQuery::kind(summit_core::SESSION_KIND)
        .with_ancestor(conference_key.clone())
        .with_filter(PropertyFilter::new(
            summit_core::session::properties::SPEAKER,
            CompareOp::Eq,
            FieldValue::str(speaker),
        ));
    let sessions = store.query(&query).await?;

    if sessions.len() >= FEATURED_SPEAKER_MIN_SESSIONS {
        let announcement = format!(
            "Featured speaker for this conference is {speaker}. Please plan on attending these sessions!"
        );
        cache.set(FEATURED_SPEAKER_KEY, announcement).await;
        tracing::info!(
            speaker,
            sessions = sessions.len(),
            "featured speaker cache refreshed"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::{Conference, ConferenceKey, Entity, ProfileKey, Session, SessionKey, SessionType};
    use summit_db_memory::{InMemoryStore, MemoryCache};
    use time::macros::date;

    async fn seed_conference(store: &InMemoryStore, id: u64, name: &str, seats: u32) {
        let mut conf = Conference::new(ConferenceKey::new(ProfileKey::new("alice"), id), name);
        conf.max_attendees = 100;
        conf.seats_available = seats;
        store.put(Entity::from(conf)).await.unwrap();
    }

    async fn seed_session(store: &InMemoryStore, conference: &ConferenceKey, id: u64, speaker: &str) {
        let session = Session::new(
            SessionKey::new(conference.clone(), id),
            format!("Session {id}"),
            speaker,
            SessionType::Lecture,
            date!(2026 - 06 - 10),
        );
        store.put(Entity::from(session)).await.unwrap();
    }

    #[tokio::test]
    async fn test_announcement_lists_only_nearly_sold_out() {
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        for (id, seats) in [(1, 0), (2, 3), (3, 5), (4, 6), (5, 10)] {
            seed_conference(&store, id, &format!("Conf{seats}"), seats).await;
        }

        let written = refresh_announcement(&store, &cache).await.unwrap();
        let announcement = written.unwrap();
        assert_eq!(
            announcement,
            "Last chance to attend! The following conferences are nearly sold out: Conf3, Conf5"
        );
        assert_eq!(
            cache.get(RECENT_ANNOUNCEMENTS_KEY).await,
            Some(announcement)
        );
    }

    #[tokio::test]
    async fn test_announcement_deleted_when_none_qualify() {
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        cache
            .set(RECENT_ANNOUNCEMENTS_KEY, "stale".to_string())
            .await;
        seed_conference(&store, 1, "Empty", 0).await;
        seed_conference(&store, 2, "Roomy", 50).await;

        let written = refresh_announcement(&store, &cache).await.unwrap();
        assert!(written.is_none());
        assert_eq!(cache.get(RECENT_ANNOUNCEMENTS_KEY).await, None);
    }

    #[tokio::test]
    async fn test_announcement_is_idempotent() {
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        seed_conference(&store, 1, "Beta", 2).await;
        seed_conference(&store, 2, "Alpha", 4).await;

        let first = refresh_announcement(&store, &cache).await.unwrap();
        let second = refresh_announcement(&store, &cache).await.unwrap();
        assert_eq!(first, second);
        // Name order, not insertion order
        assert!(first.unwrap().ends_with("Alpha, Beta"));
    }

    #[tokio::test]
    async fn test_featured_speaker_threshold() {
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        let conference = ConferenceKey::new(ProfileKey::new("alice"), 1);
        seed_session(&store, &conference, 1, "Alice").await;
        seed_session(&store, &conference, 2, "Alice").await;
        seed_session(&store, &conference, 3, "Bob").await;
        let token = conference.websafe();

        // Bob has a single session: no write
        refresh_featured_speaker(&store, &cache, &token, "Bob")
            .await
            .unwrap();
        assert_eq!(cache.get(FEATURED_SPEAKER_KEY).await, None);

        // Alice has two: featured
        refresh_featured_speaker(&store, &cache, &token, "Alice")
            .await
            .unwrap();
        assert_eq!(
            cache.get(FEATURED_SPEAKER_KEY).await.as_deref(),
            Some(
                "Featured speaker for this conference is Alice. Please plan on attending these sessions!"
            )
        );

        // Triggering on Bob afterwards leaves the stale entry in place
        refresh_featured_speaker(&store, &cache, &token, "Bob")
            .await
            .unwrap();
        assert!(cache.get(FEATURED_SPEAKER_KEY).await.is_some());
    }

    #[tokio::test]
    async fn test_featured_speaker_counts_per_conference() {
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        let first = ConferenceKey::new(ProfileKey::new("alice"), 1);
        let second = ConferenceKey::new(ProfileKey::new("alice"), 2);
        seed_session(&store, &first, 1, "Alice").await;
        seed_session(&store, &second, 1, "Alice").await;

        // One session in each conference: never featured
        refresh_featured_speaker(&store, &cache, &first.websafe(), "Alice")
            .await
            .unwrap();
        assert_eq!(cache.get(FEATURED_SPEAKER_KEY).await, None);
    }

    #[tokio::test]
    async fn test_featured_speaker_rejects_bad_token() {
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        let err = refresh_featured_speaker(&store, &cache, "not-a-key", "Alice").await;
        assert!(err.is_err());

        // A profile token is not a conference token
        let token = ProfileKey::new("alice").websafe();
        let err = refresh_featured_speaker(&store, &cache, &token, "Alice").await;
        assert!(err.is_err());
    }
}
