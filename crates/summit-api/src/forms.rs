//! Wire forms and their explicit entity mappings.
//!
//! Every mapping between a form and an entity is written out field by
//! field, so an omitted field is visible in review rather than silently
//! skipped at runtime.

use serde::{Deserialize, Serialize};
use summit_core::time::{format_date, format_start_time};
use summit_core::{Conference, Profile, Session, TeeShirtSize};
use summit_query::FilterSpec;

/// Conference as it leaves the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceForm {
    pub websafe_key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub city: String,
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub month: u8,
    pub max_attendees: u32,
    pub seats_available: u32,
    pub organizer_user_id: String,
}

impl ConferenceForm {
    pub fn from_conference(conference: &Conference) -> Self {
        Self {
            websafe_key: conference.key().websafe(),
            name: conference.name.clone(),
            description: conference.description.clone(),
            city: conference.city.clone(),
            topics: conference.topics.clone(),
            start_date: conference.start_date.map(format_date),
            end_date: conference.end_date.map(format_date),
            month: conference.month,
            max_attendees: conference.max_attendees,
            seats_available: conference.seats_available,
            organizer_user_id: conference.organizer_user_id.clone(),
        }
    }
}

/// Fields accepted when creating a conference.
///
/// Omitted fields get creation defaults (see `summit_core::conference`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub topics: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_attendees: Option<u32>,
}

/// Fields accepted when updating a conference; absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConferenceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub topics: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_attendees: Option<u32>,
}

/// Filtered conference query request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceQueryRequest {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

/// Session as it leaves the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionForm {
    pub websafe_key: String,
    pub websafe_conference_key: String,
    pub session_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
    pub speaker: String,
    pub duration: u32,
    pub type_of_session: String,
    pub session_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl SessionForm {
    pub fn from_session(session: &Session) -> Self {
        Self {
            websafe_key: session.key().websafe(),
            websafe_conference_key: session.key().conference().websafe(),
            session_name: session.session_name.clone(),
            highlights: session.highlights.clone(),
            speaker: session.speaker.clone(),
            duration: session.duration_minutes,
            type_of_session: session.type_of_session.to_string(),
            session_date: format_date(session.session_date),
            start_time: session.start_time.map(format_start_time),
        }
    }
}

/// Fields accepted when creating a session under a conference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub session_name: String,
    pub highlights: Option<String>,
    pub speaker: String,
    pub duration: Option<u32>,
    pub type_of_session: Option<String>,
    pub session_date: Option<String>,
    pub start_time: Option<String>,
}

/// Profile as it leaves the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub display_name: String,
    pub email: String,
    pub tee_shirt_size: TeeShirtSize,
    pub conference_keys_to_attend: Vec<String>,
    pub sessions_in_wishlist: Vec<String>,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            tee_shirt_size: profile.tee_shirt_size,
            conference_keys_to_attend: profile.conference_keys_to_attend.clone(),
            sessions_in_wishlist: profile.sessions_in_wishlist.clone(),
        }
    }
}

/// Fields accepted when saving a profile; absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<String>,
}

/// Boolean outcome wrapper for registration-style operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BooleanMessage {
    pub data: bool,
}

impl From<bool> for BooleanMessage {
    fn from(data: bool) -> Self {
        Self { data }
    }
}

/// String payload wrapper, used for announcement reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StringMessage {
    pub data: String,
}

impl From<String> for StringMessage {
    fn from(data: String) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConferenceListResponse {
    pub items: Vec<ConferenceForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionListResponse {
    pub items: Vec<SessionForm>,
}
