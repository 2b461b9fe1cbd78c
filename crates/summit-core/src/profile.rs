//! Profile entity and shirt-size enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::key::ProfileKey;

/// Tee-shirt size preference stored on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeeShirtSize {
    #[default]
    NotSpecified,
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
}

impl TeeShirtSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSpecified => "NOT_SPECIFIED",
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
            Self::Xxxl => "XXXL",
        }
    }
}

impl std::fmt::Display for TeeShirtSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeeShirtSize {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NOT_SPECIFIED" => Ok(Self::NotSpecified),
            "XS" => Ok(Self::Xs),
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::Xl),
            "XXL" => Ok(Self::Xxl),
            "XXXL" => Ok(Self::Xxxl),
            other => Err(CoreError::InvalidShirtSize(other.to_string())),
        }
    }
}

/// A user profile, created lazily on first authenticated access.
///
/// The attend list and wishlist are ordered but act as sets: a key token
/// appears at most once. Membership is checked by the registration and
/// wishlist workflows before appending.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    key: ProfileKey,
    pub display_name: String,
    pub email: String,
    pub tee_shirt_size: TeeShirtSize,
    /// Websafe tokens of conferences the user registered for.
    pub conference_keys_to_attend: Vec<String>,
    /// Websafe tokens of sessions in the user's wishlist.
    pub sessions_in_wishlist: Vec<String>,
}

impl Profile {
    pub fn new(key: ProfileKey, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            email: email.into(),
            tee_shirt_size: TeeShirtSize::NotSpecified,
            conference_keys_to_attend: Vec::new(),
            sessions_in_wishlist: Vec::new(),
        }
    }

    pub fn key(&self) -> &ProfileKey {
        &self.key
    }

    pub fn is_attending(&self, conference_token: &str) -> bool {
        self.conference_keys_to_attend
            .iter()
            .any(|t| t == conference_token)
    }

    pub fn has_in_wishlist(&self, session_token: &str) -> bool {
        self.sessions_in_wishlist.iter().any(|t| t == session_token)
    }
}
