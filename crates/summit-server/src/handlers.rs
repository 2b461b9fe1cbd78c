//! HTTP handlers; thin adapters between axum and the services.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;
use summit_api::{
    ApiError, BooleanMessage, ConferenceForm, ConferenceListResponse, ConferenceQueryRequest,
    CreateConferenceRequest, CreateSessionRequest, ProfileForm, ProfileUpdateRequest, SessionForm,
    SessionListResponse, StringMessage, UpdateConferenceRequest,
};

use crate::auth::AuthUser;
use crate::jobs::{FEATURED_SPEAKER_KEY, RECENT_ANNOUNCEMENTS_KEY};
use crate::services::{conference, profile, registration, session, wishlist};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Summit API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

// ---- Conferences ----

pub async fn create_conference(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateConferenceRequest>,
) -> Result<Json<ConferenceForm>, ApiError> {
    Ok(Json(conference::create_conference(&state, &user, request).await?))
}

pub async fn get_conference(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ConferenceForm>, ApiError> {
    Ok(Json(conference::get_conference(&state, &token).await?))
}

pub async fn update_conference(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
    Json(request): Json<UpdateConferenceRequest>,
) -> Result<Json<ConferenceForm>, ApiError> {
    Ok(Json(
        conference::update_conference(&state, &user, &token, request).await?,
    ))
}

pub async fn query_conferences(
    State(state): State<AppState>,
    Json(request): Json<ConferenceQueryRequest>,
) -> Result<Json<ConferenceListResponse>, ApiError> {
    Ok(Json(conference::query_conferences(&state, request).await?))
}

pub async fn conferences_created(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ConferenceListResponse>, ApiError> {
    Ok(Json(conference::conferences_created(&state, &user).await?))
}

pub async fn conferences_to_attend(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ConferenceListResponse>, ApiError> {
    Ok(Json(conference::conferences_to_attend(&state, &user).await?))
}

// ---- Registration ----

pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    Ok(Json(registration::register(&state, &user, &token).await?))
}

pub async fn unregister(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    Ok(Json(registration::unregister(&state, &user, &token).await?))
}

// ---- Sessions ----

pub async fn create_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionForm>, ApiError> {
    Ok(Json(
        session::create_session(&state, &user, &token, request).await?,
    ))
}

pub async fn list_conference_sessions(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SessionListResponse>, ApiError> {
    Ok(Json(session::list_conference_sessions(&state, &token).await?))
}

pub async fn sessions_by_type(
    State(state): State<AppState>,
    Path((token, type_of_session)): Path<(String, String)>,
) -> Result<Json<SessionListResponse>, ApiError> {
    Ok(Json(
        session::sessions_by_type(&state, &token, &type_of_session).await?,
    ))
}

pub async fn sessions_by_speaker(
    State(state): State<AppState>,
    Path(speaker): Path<String>,
) -> Result<Json<SessionListResponse>, ApiError> {
    Ok(Json(session::sessions_by_speaker(&state, &speaker).await?))
}

pub async fn early_non_workshop_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, ApiError> {
    Ok(Json(session::early_non_workshop_sessions(&state).await?))
}

pub async fn total_session_count(
    State(state): State<AppState>,
) -> Result<Json<StringMessage>, ApiError> {
    Ok(Json(session::total_session_count(&state).await?))
}

pub async fn keynote_speakers(
    State(state): State<AppState>,
) -> Result<Json<StringMessage>, ApiError> {
    Ok(Json(session::keynote_speakers(&state).await?))
}

// ---- Wishlist ----

pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    Ok(Json(wishlist::add_to_wishlist(&state, &user, &token).await?))
}

pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<BooleanMessage>, ApiError> {
    Ok(Json(
        wishlist::remove_from_wishlist(&state, &user, &token).await?,
    ))
}

pub async fn list_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SessionListResponse>, ApiError> {
    Ok(Json(wishlist::list_wishlist(&state, &user).await?))
}

// ---- Profile ----

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileForm>, ApiError> {
    Ok(Json(profile::get_profile(&state, &user).await?))
}

pub async fn save_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileForm>, ApiError> {
    Ok(Json(profile::save_profile(&state, &user, request).await?))
}

// ---- Cached reads ----

/// Latest near-sold-out announcement; empty string when none is cached.
pub async fn get_announcement(State(state): State<AppState>) -> Json<StringMessage> {
    let announcement = state
        .cache
        .get(RECENT_ANNOUNCEMENTS_KEY)
        .await
        .unwrap_or_default();
    Json(StringMessage::from(announcement))
}

/// Latest featured-speaker notice; empty string when none is cached.
pub async fn get_featured_speaker(State(state): State<AppState>) -> Json<StringMessage> {
    let notice = state
        .cache
        .get(FEATURED_SPEAKER_KEY)
        .await
        .unwrap_or_default();
    Json(StringMessage::from(notice))
}
