//! Profile access and updates.

use summit_api::{ApiError, ProfileForm, ProfileUpdateRequest};
use summit_core::{Entity, EntityKey, Profile, TeeShirtSize};
use summit_storage::TRANSACTION_RETRY_LIMIT;

use crate::auth::AuthUser;
use crate::state::AppState;

/// Fetches the caller's profile, creating it on first access.
pub async fn get_or_create_profile(
    state: &AppState,
    user: &AuthUser,
) -> Result<Profile, ApiError> {
    let key = user.profile_key();
    let entity_key = EntityKey::from(key.clone());
    if let Some(entity) = state.store.get(&entity_key).await? {
        return entity
            .into_profile()
            .ok_or_else(|| ApiError::internal(format!("wrong entity kind at {entity_key}")));
    }

    let profile = Profile::new(
        key,
        user.default_display_name(),
        user.email.clone().unwrap_or_default(),
    );
    state.store.put(Entity::from(profile.clone())).await?;
    tracing::debug!(user = %user.user_id, "profile created");
    Ok(profile)
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> Result<ProfileForm, ApiError> {
    let profile = get_or_create_profile(state, user).await?;
    Ok(ProfileForm::from_profile(&profile))
}

/// Applies a partial profile update and returns the saved form.
///
/// Runs transactionally; the registration and wishlist workflows mutate
/// the same record, and a plain read-modify-put could overwrite their
/// freshly committed list entries with a stale copy.
pub async fn save_profile(
    state: &AppState,
    user: &AuthUser,
    request: ProfileUpdateRequest,
) -> Result<ProfileForm, ApiError> {
    let display_name = request
        .display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let tee_shirt_size = request
        .tee_shirt_size
        .map(|s| s.parse::<TeeShirtSize>())
        .transpose()?;
    get_or_create_profile(state, user).await?;
    let key = EntityKey::from(user.profile_key());

    for _attempt in 0..TRANSACTION_RETRY_LIMIT {
        let mut txn = state.store.begin_transaction(false).await?;
        let mut profile = txn
            .get(&key)
            .await?
            .and_then(Entity::into_profile)
            .ok_or_else(|| ApiError::internal("profile disappeared during save"))?;
        if let Some(name) = &display_name {
            profile.display_name = name.clone();
        }
        if let Some(size) = tee_shirt_size {
            profile.tee_shirt_size = size;
        }
        txn.put(Entity::from(profile.clone()));
        match txn.commit().await {
            Ok(()) => return Ok(ProfileForm::from_profile(&profile)),
            Err(e) if e.is_contention() => {
                tracing::debug!(user = %user.user_id, "profile save contended; retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(
        "profile update conflicted with concurrent updates; retry",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::TeeShirtSize;

    fn test_state() -> AppState {
        AppState::in_memory(1)
    }

    fn alice() -> AuthUser {
        AuthUser {
            user_id: "alice".into(),
            email: Some("alice@example.com".into()),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_profile_created_lazily_with_email_prefix() {
        let state = test_state();
        let profile = get_or_create_profile(&state, &alice()).await.unwrap();
        assert_eq!(profile.display_name, "alice");
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.tee_shirt_size, TeeShirtSize::NotSpecified);

        // Second access returns the stored profile, not a fresh one
        let again = get_or_create_profile(&state, &alice()).await.unwrap();
        assert_eq!(again, profile);
    }

    #[tokio::test]
    async fn test_save_profile_applies_partial_update() {
        let state = test_state();
        let form = save_profile(
            &state,
            &alice(),
            ProfileUpdateRequest {
                display_name: Some("Alice L.".into()),
                tee_shirt_size: Some("XL".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(form.display_name, "Alice L.");
        assert_eq!(form.tee_shirt_size, TeeShirtSize::Xl);

        // Absent fields stay as they are
        let form = save_profile(&state, &alice(), ProfileUpdateRequest::default())
            .await
            .unwrap();
        assert_eq!(form.display_name, "Alice L.");
        assert_eq!(form.tee_shirt_size, TeeShirtSize::Xl);
    }

    #[tokio::test]
    async fn test_save_profile_keeps_concurrent_registration() {
        use summit_api::CreateConferenceRequest;

        use crate::services::{conference, registration};

        let state = test_state();
        let alice = alice();
        get_or_create_profile(&state, &alice).await.unwrap();

        let organizer = AuthUser {
            user_id: "organizer".into(),
            email: None,
            display_name: None,
        };
        let form = conference::create_conference(
            &state,
            &organizer,
            CreateConferenceRequest {
                name: "RustConf".into(),
                description: None,
                city: None,
                topics: None,
                start_date: None,
                end_date: None,
                max_attendees: Some(10),
            },
        )
        .await
        .unwrap();

        // Whatever way the two commits interleave, neither update may be
        // lost: the attend-list entry and the rename both survive.
        let (registered, saved) = tokio::join!(
            registration::register(&state, &alice, &form.websafe_key),
            save_profile(
                &state,
                &alice,
                ProfileUpdateRequest {
                    display_name: Some("Alice L.".into()),
                    tee_shirt_size: None,
                },
            ),
        );
        assert!(registered.unwrap().data);
        assert_eq!(saved.unwrap().display_name, "Alice L.");

        let profile = get_or_create_profile(&state, &alice).await.unwrap();
        assert!(profile.is_attending(&form.websafe_key));
        assert_eq!(profile.display_name, "Alice L.");
        let conf = conference::get_conference(&state, &form.websafe_key)
            .await
            .unwrap();
        assert_eq!(conf.seats_available, 9);
    }

    #[tokio::test]
    async fn test_save_profile_rejects_unknown_shirt_size() {
        let state = test_state();
        let err = save_profile(
            &state,
            &alice(),
            ProfileUpdateRequest {
                display_name: None,
                tee_shirt_size: Some("HUGE".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
