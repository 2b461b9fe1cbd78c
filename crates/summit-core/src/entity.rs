//! The entity sum type handed to the storage layer.

use crate::conference::Conference;
use crate::field::FieldValue;
use crate::key::EntityKey;
use crate::profile::Profile;
use crate::session::Session;

/// Any storable record.
///
/// The storage layer operates on `Entity` values uniformly; workflows
/// match back to the concrete type after a read.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Conference(Conference),
    Session(Session),
    Profile(Profile),
}

impl Entity {
    pub fn key(&self) -> EntityKey {
        match self {
            Self::Conference(c) => EntityKey::Conference(c.key().clone()),
            Self::Session(s) => EntityKey::Session(s.key().clone()),
            Self::Profile(p) => EntityKey::Profile(p.key().clone()),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.key().kind()
    }

    /// Value of a queryable property, `None` for unknown names.
    ///
    /// Profiles expose no queryable properties; they are always fetched
    /// by key.
    pub fn field(&self, property: &str) -> Option<FieldValue> {
        match self {
            Self::Conference(c) => c.field(property),
            Self::Session(s) => s.field(property),
            Self::Profile(_) => None,
        }
    }

    pub fn as_conference(&self) -> Option<&Conference> {
        match self {
            Self::Conference(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_session(&self) -> Option<&Session> {
        match self {
            Self::Session(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_profile(&self) -> Option<&Profile> {
        match self {
            Self::Profile(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_conference(self) -> Option<Conference> {
        match self {
            Self::Conference(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Session(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_profile(self) -> Option<Profile> {
        match self {
            Self::Profile(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Conference> for Entity {
    fn from(value: Conference) -> Self {
        Self::Conference(value)
    }
}

impl From<Session> for Entity {
    fn from(value: Session) -> Self {
        Self::Session(value)
    }
}

impl From<Profile> for Entity {
    fn from(value: Profile) -> Self {
        Self::Profile(value)
    }
}
