//! Request identity extraction.
//!
//! Authentication happens upstream (gateway or reverse proxy); the server
//! trusts the identity headers it forwards. A missing user id rejects the
//! request with 401 before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use summit_api::ApiError;
use summit_core::ProfileKey;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// The authenticated caller, extracted from forwarded identity headers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn profile_key(&self) -> ProfileKey {
        ProfileKey::new(&self.user_id)
    }

    /// Display name for lazily created profiles: the explicit name, the
    /// local part of the email, or the raw user id.
    pub fn default_display_name(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        if let Some(email) = &self.email {
            if let Some(local) = email.split('@').next() {
                if !local.is_empty() {
                    return local.to_string();
                }
            }
        }
        self.user_id.clone()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("authentication required"))?;
        Ok(Self {
            user_id,
            email: header(USER_EMAIL_HEADER),
            display_name: header(USER_NAME_HEADER),
        })
    }
}
