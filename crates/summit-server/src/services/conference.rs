//! Conference creation, updates and queries.

use summit_api::{
    ApiError, ConferenceForm, ConferenceListResponse, ConferenceQueryRequest,
    CreateConferenceRequest, UpdateConferenceRequest,
};
use summit_core::conference::properties;
use summit_core::time::parse_date;
use summit_core::{Conference, ConferenceKey, Entity, EntityKey};
use summit_query::build_conference_query;
use summit_storage::{EntityQuery, JobTask, SortKey, TRANSACTION_RETRY_LIMIT};

use crate::auth::AuthUser;
use crate::services::{conference_key_from_token, profile};
use crate::state::AppState;

/// Creates a conference owned by the caller and kicks off an
/// announcement refresh.
pub async fn create_conference(
    state: &AppState,
    user: &AuthUser,
    request: CreateConferenceRequest,
) -> Result<ConferenceForm, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_argument("conference 'name' field required"));
    }
    // The owning profile must exist before anything hangs off it.
    profile::get_or_create_profile(state, user).await?;

    let owner = user.profile_key();
    let id = state
        .store
        .allocate_id(&EntityKey::from(owner.clone()))
        .await?;
    let mut conference = Conference::new(ConferenceKey::new(owner, id), name);

    if let Some(description) = request.description {
        conference.description = Some(description);
    }
    if let Some(city) = request.city.filter(|c| !c.trim().is_empty()) {
        conference.city = city;
    }
    if let Some(topics) = request.topics.filter(|t| !t.is_empty()) {
        conference.topics = topics;
    }
    if let Some(raw) = request.start_date {
        conference.set_start_date(Some(parse_date(&raw)?));
    }
    if let Some(raw) = request.end_date {
        conference.end_date = Some(parse_date(&raw)?);
    }
    if let Some(max) = request.max_attendees {
        conference.max_attendees = max;
        conference.seats_available = max;
    }

    state.store.put(Entity::from(conference.clone())).await?;
    tracing::info!(key = %conference.key().path(), "conference created");
    state.dispatcher.enqueue(JobTask::RefreshAnnouncement);
    Ok(ConferenceForm::from_conference(&conference))
}

pub async fn get_conference(state: &AppState, token: &str) -> Result<ConferenceForm, ApiError> {
    let key = conference_key_from_token(token)?;
    let entity = state
        .store
        .get(&EntityKey::from(key))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no conference found with key: {token}")))?;
    let conference = entity
        .into_conference()
        .ok_or_else(|| ApiError::internal("wrong entity kind at conference key"))?;
    Ok(ConferenceForm::from_conference(&conference))
}

/// Applies a partial update; only the organizer may do this.
pub async fn update_conference(
    state: &AppState,
    user: &AuthUser,
    token: &str,
    request: UpdateConferenceRequest,
) -> Result<ConferenceForm, ApiError> {
    let key = EntityKey::from(conference_key_from_token(token)?);

    for _attempt in 0..TRANSACTION_RETRY_LIMIT {
        let mut txn = state.store.begin_transaction(false).await?;
        let entity = txn
            .get(&key)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("no conference found with key: {token}")))?;
        let mut conference = entity
            .into_conference()
            .ok_or_else(|| ApiError::internal("wrong entity kind at conference key"))?;
        if conference.organizer_user_id != user.user_id {
            txn.rollback();
            return Err(ApiError::forbidden(
                "only the organizer may update this conference",
            ));
        }

        if let Some(name) = &request.name {
            let name = name.trim();
            if name.is_empty() {
                txn.rollback();
                return Err(ApiError::invalid_argument("conference 'name' must not be empty"));
            }
            conference.name = name.to_string();
        }
        if let Some(description) = &request.description {
            conference.description = Some(description.clone());
        }
        if let Some(city) = &request.city {
            if !city.trim().is_empty() {
                conference.city = city.clone();
            }
        }
        if let Some(topics) = &request.topics {
            if !topics.is_empty() {
                conference.topics = topics.clone();
            }
        }
        if let Some(raw) = &request.start_date {
            conference.set_start_date(Some(parse_date(raw)?));
        }
        if let Some(raw) = &request.end_date {
            conference.end_date = Some(parse_date(raw)?);
        }
        if let Some(max) = request.max_attendees {
            conference.max_attendees = max;
            // Lowering capacity must not leave more seats than exist.
            conference.seats_available = conference.seats_available.min(max);
        }

        txn.put(Entity::from(conference.clone()));
        match txn.commit().await {
            Ok(()) => return Ok(ConferenceForm::from_conference(&conference)),
            Err(e) if e.is_contention() => {
                tracing::debug!(%key, "conference update contended; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(
        "conference update conflicted with concurrent updates; retry",
    ))
}

/// Runs a filtered conference query.
pub async fn query_conferences(
    state: &AppState,
    request: ConferenceQueryRequest,
) -> Result<ConferenceListResponse, ApiError> {
    let query = build_conference_query(&request.filters)?;
    let entities = state.store.query(&query).await?;
    Ok(ConferenceListResponse {
        items: entities
            .iter()
            .filter_map(Entity::as_conference)
            .map(ConferenceForm::from_conference)
            .collect(),
    })
}

/// Conferences the caller organizes, by name.
pub async fn conferences_created(
    state: &AppState,
    user: &AuthUser,
) -> Result<ConferenceListResponse, ApiError> {
    let query = EntityQuery::kind(summit_core::CONFERENCE_KIND)
        .with_ancestor(user.profile_key())
        .with_order(SortKey::asc(properties::NAME));
    let entities = state.store.query(&query).await?;
    Ok(ConferenceListResponse {
        items: entities
            .iter()
            .filter_map(Entity::as_conference)
            .map(ConferenceForm::from_conference)
            .collect(),
    })
}

/// Conferences the caller registered for, in registration order.
///
/// Tokens that no longer resolve are skipped, not errors.
pub async fn conferences_to_attend(
    state: &AppState,
    user: &AuthUser,
) -> Result<ConferenceListResponse, ApiError> {
    let profile = profile::get_or_create_profile(state, user).await?;
    let mut items = Vec::with_capacity(profile.conference_keys_to_attend.len());
    for token in &profile.conference_keys_to_attend {
        let Ok(key) = conference_key_from_token(token) else {
            tracing::warn!(token, "unparseable conference token in attend list");
            continue;
        };
        match state.store.get(&EntityKey::from(key)).await? {
            Some(entity) => {
                if let Some(conference) = entity.as_conference() {
                    items.push(ConferenceForm::from_conference(conference));
                }
            }
            None => tracing::debug!(token, "dangling conference token in attend list"),
        }
    }
    Ok(ConferenceListResponse { items })
}
