//! # summit-api
//!
//! The HTTP-facing error taxonomy and the wire forms exchanged with
//! clients. Handlers and services live in `summit-server`; this crate
//! only defines shapes and their mappings to and from the domain model.

pub mod error;
pub mod forms;

pub use error::ApiError;
pub use forms::{
    BooleanMessage, ConferenceForm, ConferenceListResponse, ConferenceQueryRequest,
    CreateConferenceRequest, CreateSessionRequest, ProfileForm, ProfileUpdateRequest, SessionForm,
    SessionListResponse, StringMessage, UpdateConferenceRequest,
};
