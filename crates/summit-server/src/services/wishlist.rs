//! Per-user session wishlists.
//!
//! The wishlist lives on the profile as an ordered list of canonical
//! session tokens. Membership changes run transactionally so two
//! concurrent adds cannot both slip in.

use summit_api::{ApiError, BooleanMessage, SessionForm, SessionListResponse};
use summit_core::{Entity, EntityKey};
use summit_storage::TRANSACTION_RETRY_LIMIT;

use crate::auth::AuthUser;
use crate::services::{profile, session_key_from_token};
use crate::state::AppState;

/// Adds a session to the caller's wishlist.
pub async fn add_to_wishlist(
    state: &AppState,
    user: &AuthUser,
    token: &str,
) -> Result<BooleanMessage, ApiError> {
    let session_key = session_key_from_token(token)?;
    let canonical = session_key.websafe();
    let session_key = EntityKey::from(session_key);
    let profile_key = EntityKey::from(user.profile_key());
    profile::get_or_create_profile(state, user).await?;

    for _attempt in 0..TRANSACTION_RETRY_LIMIT {
        // Session and profile sit under different roots.
        let mut txn = state.store.begin_transaction(true).await?;
        if txn.get(&session_key).await?.is_none() {
            txn.rollback();
            return Err(ApiError::not_found(format!("no session found with key: {token}")));
        }
        let mut profile = txn
            .get(&profile_key)
            .await?
            .and_then(Entity::into_profile)
            .ok_or_else(|| ApiError::internal("profile disappeared during wishlist update"))?;
        if profile.has_in_wishlist(&canonical) {
            txn.rollback();
            return Err(ApiError::conflict("session already in wishlist"));
        }
        profile.sessions_in_wishlist.push(canonical.clone());
        txn.put(Entity::from(profile));
        match txn.commit().await {
            Ok(()) => return Ok(BooleanMessage::from(true)),
            Err(e) if e.is_contention() => {
                tracing::debug!(session = %canonical, "wishlist add contended; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(
        "wishlist update conflicted with concurrent updates; retry",
    ))
}

/// Removes a session from the caller's wishlist.
///
/// Returns `false` when the session was not on the list.
pub async fn remove_from_wishlist(
    state: &AppState,
    user: &AuthUser,
    token: &str,
) -> Result<BooleanMessage, ApiError> {
    let session_key = session_key_from_token(token)?;
    let canonical = session_key.websafe();
    let profile_key = EntityKey::from(user.profile_key());
    profile::get_or_create_profile(state, user).await?;

    for _attempt in 0..TRANSACTION_RETRY_LIMIT {
        let mut txn = state.store.begin_transaction(false).await?;
        let mut profile = txn
            .get(&profile_key)
            .await?
            .and_then(Entity::into_profile)
            .ok_or_else(|| ApiError::internal("profile disappeared during wishlist update"))?;
        if !profile.has_in_wishlist(&canonical) {
            txn.rollback();
            return Ok(BooleanMessage::from(false));
        }
        profile.sessions_in_wishlist.retain(|t| t != &canonical);
        txn.put(Entity::from(profile));
        match txn.commit().await {
            Ok(()) => return Ok(BooleanMessage::from(true)),
            Err(e) if e.is_contention() => {
                tracing::debug!(session = %canonical, "wishlist remove contended; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(
        "wishlist update conflicted with concurrent updates; retry",
    ))
}

/// Wishlisted sessions in the order they were added.
///
/// Tokens pointing at deleted sessions are skipped.
pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> Result<SessionListResponse, ApiError> {
    let profile = profile::get_or_create_profile(state, user).await?;
    let mut items = Vec::with_capacity(profile.sessions_in_wishlist.len());
    for token in &profile.sessions_in_wishlist {
        let Ok(key) = session_key_from_token(token) else {
            tracing::warn!(token, "unparseable session token in wishlist");
            continue;
        };
        match state.store.get(&EntityKey::from(key)).await? {
            Some(entity) => {
                if let Some(session) = entity.as_session() {
                    items.push(SessionForm::from_session(session));
                }
            }
            None => tracing::debug!(token, "dangling session token in wishlist"),
        }
    }
    Ok(SessionListResponse { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use summit_api::{CreateConferenceRequest, CreateSessionRequest};

    use crate::services::conference::create_conference;
    use crate::services::session::create_session;

    fn test_state() -> AppState {
        AppState::in_memory(1)
    }

    fn user(id: &str) -> AuthUser {
        AuthUser {
            user_id: id.into(),
            email: Some(format!("{id}@example.com")),
            display_name: None,
        }
    }

    async fn seeded_session(state: &AppState, name: &str) -> String {
        let organizer = user("organizer");
        let conference = create_conference(
            state,
            &organizer,
            CreateConferenceRequest {
                name: "RustConf".into(),
                description: None,
                city: None,
                topics: None,
                start_date: None,
                end_date: None,
                max_attendees: None,
            },
        )
        .await
        .unwrap();
        create_session(
            state,
            &organizer,
            &conference.websafe_key,
            CreateSessionRequest {
                session_name: name.into(),
                highlights: None,
                speaker: "Niko".into(),
                duration: None,
                type_of_session: None,
                session_date: Some("2026-06-10".into()),
                start_time: None,
            },
        )
        .await
        .unwrap()
        .websafe_key
    }

    #[tokio::test]
    async fn test_add_and_list_preserves_order() {
        let state = test_state();
        let first = seeded_session(&state, "Zebra").await;
        let second = seeded_session(&state, "Alpha").await;
        let alice = user("alice");

        add_to_wishlist(&state, &alice, &first).await.unwrap();
        add_to_wishlist(&state, &alice, &second).await.unwrap();

        // Insertion order, not name order
        let listed = list_wishlist(&state, &alice).await.unwrap();
        let names: Vec<&str> = listed.items.iter().map(|s| s.session_name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Alpha"]);
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts() {
        let state = test_state();
        let token = seeded_session(&state, "Intro").await;
        let alice = user("alice");

        add_to_wishlist(&state, &alice, &token).await.unwrap();
        let err = add_to_wishlist(&state, &alice, &token).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(list_wishlist(&state, &alice).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_session_is_not_found() {
        let state = test_state();
        let ghost = summit_core::SessionKey::new(
            summit_core::ConferenceKey::new(summit_core::ProfileKey::new("ghost"), 1),
            1,
        )
        .websafe();
        let err = add_to_wishlist(&state, &user("alice"), &ghost).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_rejects_conference_token() {
        let state = test_state();
        let token = seeded_session(&state, "Intro").await;
        let conference_token = session_key_from_token(&token)
            .unwrap()
            .conference()
            .websafe();
        let err = add_to_wishlist(&state, &user("alice"), &conference_token)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let state = test_state();
        let token = seeded_session(&state, "Intro").await;
        let alice = user("alice");

        let removed = remove_from_wishlist(&state, &alice, &token).await.unwrap();
        assert!(!removed.data);

        add_to_wishlist(&state, &alice, &token).await.unwrap();
        let removed = remove_from_wishlist(&state, &alice, &token).await.unwrap();
        assert!(removed.data);
        assert!(list_wishlist(&state, &alice).await.unwrap().items.is_empty());

        let removed = remove_from_wishlist(&state, &alice, &token).await.unwrap();
        assert!(!removed.data);
    }

    #[tokio::test]
    async fn test_wishlists_are_per_user() {
        let state = test_state();
        let token = seeded_session(&state, "Intro").await;

        add_to_wishlist(&state, &user("alice"), &token).await.unwrap();
        assert!(list_wishlist(&state, &user("bob")).await.unwrap().items.is_empty());
    }
}
