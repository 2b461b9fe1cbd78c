//! Typed hierarchical entity keys.
//!
//! Keys model explicit ownership: a [`ConferenceKey`] carries its owning
//! [`ProfileKey`], a [`SessionKey`] carries its owning [`ConferenceKey`].
//! There is no global key registry; the parent of a key is reachable
//! through a typed accessor.
//!
//! Each key has a canonical slash-separated path (`Profile/alice/Conference/7`)
//! and an opaque URL-safe token derived from it. The token is reversible:
//! [`EntityKey::parse_websafe`] restores the original key or fails with
//! [`CoreError::InvalidKey`].

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{CoreError, Result};

/// Entity kind token for profiles.
pub const PROFILE_KIND: &str = "Profile";
/// Entity kind token for conferences.
pub const CONFERENCE_KIND: &str = "Conference";
/// Entity kind token for sessions.
pub const SESSION_KIND: &str = "Session";

/// Key of a Profile record, one per authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey(String);

impl ProfileKey {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self(user_id.into())
    }

    pub fn user_id(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> String {
        format!("{PROFILE_KIND}/{}", self.0)
    }

    pub fn websafe(&self) -> String {
        encode_path(&self.path())
    }
}

/// Key of a Conference record, owned by a Profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConferenceKey {
    owner: ProfileKey,
    id: u64,
}

impl ConferenceKey {
    pub fn new(owner: ProfileKey, id: u64) -> Self {
        Self { owner, id }
    }

    /// The owning profile key.
    pub fn owner(&self) -> &ProfileKey {
        &self.owner
    }

    pub fn local_id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> String {
        format!("{}/{CONFERENCE_KIND}/{}", self.owner.path(), self.id)
    }

    pub fn websafe(&self) -> String {
        encode_path(&self.path())
    }
}

/// Key of a Session record, owned by a Conference.
///
/// The parent conference is fixed at construction and cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    conference: ConferenceKey,
    id: u64,
}

impl SessionKey {
    pub fn new(conference: ConferenceKey, id: u64) -> Self {
        Self { conference, id }
    }

    /// The owning conference key.
    pub fn conference(&self) -> &ConferenceKey {
        &self.conference
    }

    pub fn local_id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> String {
        format!("{}/{SESSION_KIND}/{}", self.conference.path(), self.id)
    }

    pub fn websafe(&self) -> String {
        encode_path(&self.path())
    }
}

/// Any entity key, for APIs that operate across kinds (storage, queries).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Profile(ProfileKey),
    Conference(ConferenceKey),
    Session(SessionKey),
}

impl EntityKey {
    /// The entity kind this key addresses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Profile(_) => PROFILE_KIND,
            Self::Conference(_) => CONFERENCE_KIND,
            Self::Session(_) => SESSION_KIND,
        }
    }

    /// Canonical slash-separated path, unique across all entities.
    pub fn path(&self) -> String {
        match self {
            Self::Profile(k) => k.path(),
            Self::Conference(k) => k.path(),
            Self::Session(k) => k.path(),
        }
    }

    /// Path of the hierarchy root (the owning profile).
    ///
    /// Used by transactions to decide whether a set of keys spans more
    /// than one entity group.
    pub fn root_path(&self) -> String {
        match self {
            Self::Profile(k) => k.path(),
            Self::Conference(k) => k.owner().path(),
            Self::Session(k) => k.conference().owner().path(),
        }
    }

    /// Opaque, reversible, URL-safe token for this key.
    pub fn websafe(&self) -> String {
        encode_path(&self.path())
    }

    /// Restore a key from its URL-safe token.
    pub fn parse_websafe(token: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CoreError::invalid_key(token))?;
        let path = String::from_utf8(bytes).map_err(|_| CoreError::invalid_key(token))?;
        Self::parse_path(&path).map_err(|_| CoreError::invalid_key(token))
    }

    /// Restore a key from its canonical path.
    pub fn parse_path(path: &str) -> Result<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        match segments.as_slice() {
            [PROFILE_KIND, user_id] if !user_id.is_empty() => {
                Ok(Self::Profile(ProfileKey::new(*user_id)))
            }
            [PROFILE_KIND, user_id, CONFERENCE_KIND, id] if !user_id.is_empty() => {
                let id = parse_id(id, path)?;
                Ok(Self::Conference(ConferenceKey::new(
                    ProfileKey::new(*user_id),
                    id,
                )))
            }
            [PROFILE_KIND, user_id, CONFERENCE_KIND, cid, SESSION_KIND, sid]
                if !user_id.is_empty() =>
            {
                let cid = parse_id(cid, path)?;
                let sid = parse_id(sid, path)?;
                Ok(Self::Session(SessionKey::new(
                    ConferenceKey::new(ProfileKey::new(*user_id), cid),
                    sid,
                )))
            }
            _ => Err(CoreError::invalid_key(path)),
        }
    }

    /// Returns the conference key if this is a Conference key.
    pub fn as_conference(&self) -> Option<&ConferenceKey> {
        match self {
            Self::Conference(k) => Some(k),
            _ => None,
        }
    }

    /// Returns the session key if this is a Session key.
    pub fn as_session(&self) -> Option<&SessionKey> {
        match self {
            Self::Session(k) => Some(k),
            _ => None,
        }
    }
}

impl From<ProfileKey> for EntityKey {
    fn from(key: ProfileKey) -> Self {
        Self::Profile(key)
    }
}

impl From<ConferenceKey> for EntityKey {
    fn from(key: ConferenceKey) -> Self {
        Self::Conference(key)
    }
}

impl From<SessionKey> for EntityKey {
    fn from(key: SessionKey) -> Self {
        Self::Session(key)
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

fn encode_path(path: &str) -> String {
    URL_SAFE_NO_PAD.encode(path.as_bytes())
}

fn parse_id(segment: &str, path: &str) -> Result<u64> {
    segment.parse().map_err(|_| CoreError::invalid_key(path))
}
