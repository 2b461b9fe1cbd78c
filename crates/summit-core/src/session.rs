//! Session entity and session type enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::error::CoreError;
use crate::field::FieldValue;
use crate::key::SessionKey;

/// Queryable property names of a session.
pub mod properties {
    pub const SESSION_NAME: &str = "sessionName";
    pub const SPEAKER: &str = "speaker";
    pub const DURATION: &str = "duration";
    pub const TYPE_OF_SESSION: &str = "typeOfSession";
}

/// Default session duration in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 50;

/// The fixed set of session types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    Workshop,
    Lecture,
    Keynote,
    Panel,
    Unspecified,
}

impl SessionType {
    /// Canonical wire token, e.g. `WORKSHOP`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workshop => "WORKSHOP",
            Self::Lecture => "LECTURE",
            Self::Keynote => "KEYNOTE",
            Self::Panel => "PANEL",
            Self::Unspecified => "UNSPECIFIED",
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WORKSHOP" => Ok(Self::Workshop),
            "LECTURE" => Ok(Self::Lecture),
            "KEYNOTE" => Ok(Self::Keynote),
            "PANEL" => Ok(Self::Panel),
            "UNSPECIFIED" => Ok(Self::Unspecified),
            other => Err(CoreError::InvalidSessionType(other.to_string())),
        }
    }
}

/// A session within a conference.
///
/// Sessions are immutable after creation; the owning conference is fixed
/// by the key.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    key: SessionKey,
    pub session_name: String,
    pub highlights: Option<String>,
    pub speaker: String,
    pub duration_minutes: u32,
    pub type_of_session: SessionType,
    pub session_date: Date,
    pub start_time: Option<Time>,
}

impl Session {
    pub fn new(
        key: SessionKey,
        session_name: impl Into<String>,
        speaker: impl Into<String>,
        type_of_session: SessionType,
        session_date: Date,
    ) -> Self {
        Self {
            key,
            session_name: session_name.into(),
            highlights: None,
            speaker: speaker.into(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            type_of_session,
            session_date,
            start_time: None,
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Value of a queryable property, `None` for unknown names.
    pub fn field(&self, property: &str) -> Option<FieldValue> {
        match property {
            properties::SESSION_NAME => Some(FieldValue::str(&self.session_name)),
            properties::SPEAKER => Some(FieldValue::str(&self.speaker)),
            properties::DURATION => Some(FieldValue::Int(i64::from(self.duration_minutes))),
            properties::TYPE_OF_SESSION => Some(FieldValue::str(self.type_of_session.as_str())),
            _ => None,
        }
    }
}
