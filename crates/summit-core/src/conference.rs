//! Conference entity.

use time::Date;

use crate::field::FieldValue;
use crate::key::ConferenceKey;

/// Queryable property names of a conference.
pub mod properties {
    pub const NAME: &str = "name";
    pub const CITY: &str = "city";
    pub const TOPICS: &str = "topics";
    pub const MONTH: &str = "month";
    pub const MAX_ATTENDEES: &str = "maxAttendees";
    pub const SEATS_AVAILABLE: &str = "seatsAvailable";
    pub const ORGANIZER_USER_ID: &str = "organizerUserId";
}

/// Default city applied when conference creation omits one.
pub const DEFAULT_CITY: &str = "Default City";
/// Default topics applied when conference creation omits them.
pub const DEFAULT_TOPICS: [&str; 2] = ["Default", "Topic"];

/// A conference, owned by the organizer's profile.
///
/// `seats_available` is initialised to `max_attendees` on creation and is
/// mutated only by the registration workflow. It never exceeds
/// `max_attendees` and never goes below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Conference {
    key: ConferenceKey,
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub topics: Vec<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Month of `start_date` (1-12), or 0 when no start date is set.
    pub month: u8,
    pub max_attendees: u32,
    pub seats_available: u32,
    pub organizer_user_id: String,
}

impl Conference {
    /// Creates a conference with creation defaults applied.
    pub fn new(key: ConferenceKey, name: impl Into<String>) -> Self {
        let organizer_user_id = key.owner().user_id().to_string();
        Self {
            key,
            name: name.into(),
            description: None,
            city: DEFAULT_CITY.to_string(),
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            start_date: None,
            end_date: None,
            month: 0,
            max_attendees: 0,
            seats_available: 0,
            organizer_user_id,
        }
    }

    pub fn key(&self) -> &ConferenceKey {
        &self.key
    }

    /// Sets the start date and re-derives the month.
    pub fn set_start_date(&mut self, start_date: Option<Date>) {
        self.month = start_date.map(|d| u8::from(d.month())).unwrap_or(0);
        self.start_date = start_date;
    }

    pub fn has_seats(&self) -> bool {
        self.seats_available > 0
    }

    /// Value of a queryable property, `None` for unknown names.
    pub fn field(&self, property: &str) -> Option<FieldValue> {
        match property {
            properties::NAME => Some(FieldValue::str(&self.name)),
            properties::CITY => Some(FieldValue::str(&self.city)),
            properties::TOPICS => Some(FieldValue::StrList(self.topics.clone())),
            properties::MONTH => Some(FieldValue::Int(i64::from(self.month))),
            properties::MAX_ATTENDEES => Some(FieldValue::Int(i64::from(self.max_attendees))),
            properties::SEATS_AVAILABLE => Some(FieldValue::Int(i64::from(self.seats_available))),
            properties::ORGANIZER_USER_ID => Some(FieldValue::str(&self.organizer_user_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ProfileKey;
    use time::macros::date;

    fn test_key() -> ConferenceKey {
        ConferenceKey::new(ProfileKey::new("alice"), 1)
    }

    #[test]
    fn test_new_applies_defaults() {
        let conf = Conference::new(test_key(), "RustConf");
        assert_eq!(conf.city, DEFAULT_CITY);
        assert_eq!(conf.topics, vec!["Default", "Topic"]);
        assert_eq!(conf.month, 0);
        assert_eq!(conf.seats_available, 0);
        assert_eq!(conf.organizer_user_id, "alice");
    }

    #[test]
    fn test_set_start_date_derives_month() {
        let mut conf = Conference::new(test_key(), "RustConf");
        conf.set_start_date(Some(date!(2016 - 06 - 10)));
        assert_eq!(conf.month, 6);
        conf.set_start_date(None);
        assert_eq!(conf.month, 0);
    }

    #[test]
    fn test_field_access() {
        let mut conf = Conference::new(test_key(), "RustConf");
        conf.city = "London".to_string();
        conf.max_attendees = 100;

        assert_eq!(conf.field("city"), Some(FieldValue::str("London")));
        assert_eq!(conf.field("maxAttendees"), Some(FieldValue::Int(100)));
        assert_eq!(conf.field("bogus"), None);
    }
}
