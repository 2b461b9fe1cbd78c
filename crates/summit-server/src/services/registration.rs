//! Seat-accounting registration workflow.
//!
//! Register and unregister touch a Profile and a Conference under
//! different roots, so both run as cross-group transactions with a
//! bounded retry on contention.

use summit_api::{ApiError, BooleanMessage};
use summit_core::{Entity, EntityKey};
use summit_storage::{JobTask, TRANSACTION_RETRY_LIMIT};

use crate::auth::AuthUser;
use crate::services::{conference_key_from_token, profile};
use crate::state::AppState;

/// Registers the caller for a conference, taking one seat.
pub async fn register(
    state: &AppState,
    user: &AuthUser,
    token: &str,
) -> Result<BooleanMessage, ApiError> {
    let conference_key = conference_key_from_token(token)?;
    // Normalised token; what the client sent may encode the same path
    // differently.
    let canonical = conference_key.websafe();
    let conference_key = EntityKey::from(conference_key);
    let profile_key = EntityKey::from(user.profile_key());
    // Create the profile outside the transaction so a first-time caller
    // does not contend on the insert.
    profile::get_or_create_profile(state, user).await?;

    for _attempt in 0..TRANSACTION_RETRY_LIMIT {
        let mut txn = state.store.begin_transaction(true).await?;
        let mut profile = txn
            .get(&profile_key)
            .await?
            .and_then(Entity::into_profile)
            .ok_or_else(|| ApiError::internal("profile disappeared during registration"))?;
        let mut conference = txn
            .get(&conference_key)
            .await?
            .and_then(Entity::into_conference)
            .ok_or_else(|| ApiError::not_found(format!("no conference found with key: {token}")))?;

        if profile.is_attending(&canonical) {
            txn.rollback();
            return Err(ApiError::conflict("already registered for this conference"));
        }
        if !conference.has_seats() {
            txn.rollback();
            return Err(ApiError::conflict("no seats available"));
        }

        profile.conference_keys_to_attend.push(canonical.clone());
        conference.seats_available -= 1;
        txn.put(Entity::from(profile));
        txn.put(Entity::from(conference));
        match txn.commit().await {
            Ok(()) => {
                tracing::info!(conference = %canonical, user = %user.user_id, "registered");
                state.dispatcher.enqueue(JobTask::RefreshAnnouncement);
                return Ok(BooleanMessage::from(true));
            }
            Err(e) if e.is_contention() => {
                tracing::debug!(conference = %canonical, "registration contended; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(
        "registration conflicted with concurrent updates; retry",
    ))
}

/// Releases the caller's seat.
///
/// Returns `false` when the caller was not registered; that is an
/// idempotent no-op, not an error.
pub async fn unregister(
    state: &AppState,
    user: &AuthUser,
    token: &str,
) -> Result<BooleanMessage, ApiError> {
    let conference_key = conference_key_from_token(token)?;
    let canonical = conference_key.websafe();
    let conference_key = EntityKey::from(conference_key);
    let profile_key = EntityKey::from(user.profile_key());
    profile::get_or_create_profile(state, user).await?;

    for _attempt in 0..TRANSACTION_RETRY_LIMIT {
        let mut txn = state.store.begin_transaction(true).await?;
        let mut profile = txn
            .get(&profile_key)
            .await?
            .and_then(Entity::into_profile)
            .ok_or_else(|| ApiError::internal("profile disappeared during unregistration"))?;

        if !profile.is_attending(&canonical) {
            txn.rollback();
            return Ok(BooleanMessage::from(false));
        }
        profile.conference_keys_to_attend.retain(|t| t != &canonical);
        txn.put(Entity::from(profile));

        // The conference may have been deleted since registration; the
        // seat count only exists while it does.
        if let Some(mut conference) = txn.get(&conference_key).await?.and_then(Entity::into_conference) {
            conference.seats_available =
                (conference.seats_available + 1).min(conference.max_attendees);
            txn.put(Entity::from(conference));
        }

        match txn.commit().await {
            Ok(()) => {
                tracing::info!(conference = %canonical, user = %user.user_id, "unregistered");
                state.dispatcher.enqueue(JobTask::RefreshAnnouncement);
                return Ok(BooleanMessage::from(true));
            }
            Err(e) if e.is_contention() => {
                tracing::debug!(conference = %canonical, "unregistration contended; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(
        "unregistration conflicted with concurrent updates; retry",
    ))
}
