//! Session creation and the session query family.

use summit_api::{ApiError, CreateSessionRequest, SessionForm, SessionListResponse, StringMessage};
use summit_core::session::{DEFAULT_DURATION_MINUTES, properties};
use summit_core::time::{parse_date, parse_start_time};
use summit_core::{Entity, EntityKey, FieldValue, Session, SessionKey, SessionType};
use summit_storage::{CompareOp, EntityQuery, PropertyFilter, SortKey};
use time::Time;

use crate::auth::AuthUser;
use crate::services::conference_key_from_token;
use crate::state::AppState;

/// Sessions starting at or after this hour are no longer "early".
const EARLY_SESSION_CUTOFF_HOUR: u8 = 19;

/// Creates a session under a conference; only the organizer may do
/// this. Enqueues a featured-speaker refresh for the new speaker.
pub async fn create_session(
    state: &AppState,
    user: &AuthUser,
    token: &str,
    request: CreateSessionRequest,
) -> Result<SessionForm, ApiError> {
    let conference_key = conference_key_from_token(token)?;
    let conference = state
        .store
        .get(&EntityKey::from(conference_key.clone()))
        .await?
        .and_then(Entity::into_conference)
        .ok_or_else(|| ApiError::not_found(format!("no conference found with key: {token}")))?;
    if conference.organizer_user_id != user.user_id {
        return Err(ApiError::forbidden(
            "only the organizer may add sessions to this conference",
        ));
    }

    let name = request.session_name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_argument("session 'sessionName' field required"));
    }
    let speaker = request.speaker.trim();
    if speaker.is_empty() {
        return Err(ApiError::invalid_argument("session 'speaker' field required"));
    }
    let session_date = match request.session_date {
        Some(raw) => parse_date(&raw)?,
        None => return Err(ApiError::invalid_argument("session 'sessionDate' field required")),
    };
    let type_of_session = match request.type_of_session {
        Some(raw) => raw.parse::<SessionType>()?,
        None => SessionType::Unspecified,
    };

    let id = state
        .store
        .allocate_id(&EntityKey::from(conference_key.clone()))
        .await?;
    let mut session = Session::new(
        SessionKey::new(conference_key.clone(), id),
        name,
        speaker,
        type_of_session,
        session_date,
    );
    session.highlights = request.highlights;
    session.duration_minutes = request.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
    if let Some(raw) = request.start_time {
        session.start_time = Some(parse_start_time(&raw)?);
    }

    state.store.put(Entity::from(session.clone())).await?;
    tracing::info!(key = %session.key().path(), "session created");
    state.dispatcher.enqueue(summit_storage::JobTask::RefreshFeaturedSpeaker {
        conference: conference_key.websafe(),
        speaker: session.speaker.clone(),
    });
    Ok(SessionForm::from_session(&session))
}

/// All sessions of a conference, by session name.
pub async fn list_conference_sessions(
    state: &AppState,
    token: &str,
) -> Result<SessionListResponse, ApiError> {
    let key = conference_key_from_token(token)?;
    let query = EntityQuery::kind(summit_core::SESSION_KIND)
        .with_ancestor(key)
        .with_order(SortKey::asc(properties::SESSION_NAME));
    collect_sessions(state, &query).await
}

/// Sessions of a conference restricted to one type.
pub async fn sessions_by_type(
    state: &AppState,
    token: &str,
    type_of_session: &str,
) -> Result<SessionListResponse, ApiError> {
    let key = conference_key_from_token(token)?;
    let session_type = type_of_session.parse::<SessionType>()?;
    let query = EntityQuery::kind(summit_core::SESSION_KIND)
        .with_ancestor(key)
        .with_filter(PropertyFilter::new(
            properties::TYPE_OF_SESSION,
            CompareOp::Eq,
            FieldValue::str(session_type.as_str()),
        ))
        .with_order(SortKey::asc(properties::SESSION_NAME));
    collect_sessions(state, &query).await
}

/// Sessions by a speaker across all conferences.
pub async fn sessions_by_speaker(
    state: &AppState,
    speaker: &str,
) -> Result<SessionListResponse, ApiError> {
    let query = EntityQuery::kind(summit_core::SESSION_KIND)
        .with_filter(PropertyFilter::new(
            properties::SPEAKER,
            CompareOp::Eq,
            FieldValue::str(speaker),
        ))
        .with_order(SortKey::asc(properties::SESSION_NAME));
    collect_sessions(state, &query).await
}

/// Non-workshop sessions starting before 19:00.
///
/// The type exclusion runs store-side; the time bound is applied in
/// memory because it would be a second inequality property.
pub async fn early_non_workshop_sessions(
    state: &AppState,
) -> Result<SessionListResponse, ApiError> {
    let cutoff = Time::from_hms(EARLY_SESSION_CUTOFF_HOUR, 0, 0)
        .map_err(|e| ApiError::internal(format!("bad cutoff time: {e}")))?;
    let query = EntityQuery::kind(summit_core::SESSION_KIND)
        .with_filter(PropertyFilter::new(
            properties::TYPE_OF_SESSION,
            CompareOp::Ne,
            FieldValue::str(SessionType::Workshop.as_str()),
        ))
        .with_order(SortKey::asc(properties::SESSION_NAME));
    let entities = state.store.query(&query).await?;
    let items = entities
        .iter()
        .filter_map(Entity::as_session)
        .filter(|s| s.start_time.is_some_and(|t| t < cutoff))
        .map(SessionForm::from_session)
        .collect();
    Ok(SessionListResponse { items })
}

/// Total number of sessions across all conferences, as a string payload.
pub async fn total_session_count(state: &AppState) -> Result<StringMessage, ApiError> {
    let query = EntityQuery::kind(summit_core::SESSION_KIND);
    let entities = state.store.query(&query).await?;
    Ok(StringMessage::from(entities.len().to_string()))
}

/// Distinct speakers holding a keynote, comma-joined in name order.
///
/// Empty string when nobody keynotes.
pub async fn keynote_speakers(state: &AppState) -> Result<StringMessage, ApiError> {
    let query = EntityQuery::kind(summit_core::SESSION_KIND)
        .with_filter(PropertyFilter::new(
            properties::TYPE_OF_SESSION,
            CompareOp::Eq,
            FieldValue::str(SessionType::Keynote.as_str()),
        ))
        .with_order(SortKey::asc(properties::SPEAKER));
    let entities = state.store.query(&query).await?;
    let mut speakers: Vec<&str> = entities
        .iter()
        .filter_map(Entity::as_session)
        .map(|s| s.speaker.as_str())
        .collect();
    speakers.dedup();
    Ok(StringMessage::from(speakers.join(", ")))
}

async fn collect_sessions(
    state: &AppState,
    query: &EntityQuery,
) -> Result<SessionListResponse, ApiError> {
    let entities = state.store.query(query).await?;
    Ok(SessionListResponse {
        items: entities
            .iter()
            .filter_map(Entity::as_session)
            .map(SessionForm::from_session)
            .collect(),
    })
}
