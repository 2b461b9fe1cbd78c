//! # summit-core
//!
//! Core domain model for the Summit conference server.
//!
//! This crate defines the entities (Conference, Session, Profile), their
//! typed hierarchical keys, and the value types shared by the storage and
//! query layers. It contains no I/O; storage backends and the HTTP surface
//! live in sibling crates.
//!
//! ## Key hierarchy
//!
//! Profiles own Conferences, Conferences own Sessions:
//!
//! ```text
//! Profile/<userId>
//! Profile/<userId>/Conference/<id>
//! Profile/<userId>/Conference/<id>/Session/<id>
//! ```
//!
//! Every key is externally representable as an opaque, reversible URL-safe
//! token (see [`EntityKey::websafe`]).

pub mod conference;
pub mod entity;
pub mod error;
pub mod field;
pub mod key;
pub mod profile;
pub mod session;
pub mod time;

pub use conference::Conference;
pub use entity::Entity;
pub use error::{CoreError, Result};
pub use field::FieldValue;
pub use key::{
    CONFERENCE_KIND, ConferenceKey, EntityKey, PROFILE_KIND, ProfileKey, SESSION_KIND, SessionKey,
};
pub use profile::{Profile, TeeShirtSize};
pub use session::{Session, SessionType};
