//! Workflow services behind the HTTP handlers.
//!
//! Each function validates input, talks to the store and maps domain
//! outcomes onto the API error taxonomy. Multi-record workflows run in
//! store transactions with a bounded contention retry.

pub mod conference;
pub mod profile;
pub mod registration;
pub mod session;
pub mod wishlist;

use summit_api::ApiError;
use summit_core::{ConferenceKey, EntityKey, SessionKey};

/// Decodes a websafe token into a conference key.
pub(crate) fn conference_key_from_token(token: &str) -> Result<ConferenceKey, ApiError> {
    let key = EntityKey::parse_websafe(token)?;
    key.as_conference().cloned().ok_or_else(|| {
        ApiError::invalid_argument(format!("not a conference key: {token}"))
    })
}

/// Decodes a websafe token into a session key.
pub(crate) fn session_key_from_token(token: &str) -> Result<SessionKey, ApiError> {
    let key = EntityKey::parse_websafe(token)?;
    key.as_session()
        .cloned()
        .ok_or_else(|| ApiError::invalid_argument(format!("not a session key: {token}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::ProfileKey;

    #[test]
    fn test_token_decoding_enforces_kind() {
        let conference = ConferenceKey::new(ProfileKey::new("alice"), 1);
        let session = SessionKey::new(conference.clone(), 2);

        assert!(conference_key_from_token(&conference.websafe()).is_ok());
        assert!(conference_key_from_token(&session.websafe()).is_err());
        assert!(session_key_from_token(&session.websafe()).is_ok());
        assert!(session_key_from_token(&conference.websafe()).is_err());
        assert!(conference_key_from_token("garbage").is_err());
    }
}
