use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        Complaint, DictionaryEntry, LibraryItem, Profile, ProfileForm, Recommendation, Supplement,
        DISCLAIMER,
    },
    services::{catalog::load_catalog, content, workflow::Outcome, MixerSession, SessionPhase},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct DictionaryQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub complaints: Vec<Complaint>,
    pub supplements: Vec<Supplement>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub submission_id: Uuid,
    pub profile: Profile,
    pub recommendations: Vec<Recommendation>,
    /// True when no supplement was eligible; rendered as "no recommendations"
    pub empty: bool,
    pub risk_accepted: bool,
    pub disclaimer: &'static str,
}

impl From<&Outcome> for ResultsResponse {
    fn from(outcome: &Outcome) -> Self {
        Self {
            submission_id: outcome.submission_id,
            profile: outcome.profile.clone(),
            recommendations: outcome.recommendations.clone(),
            empty: outcome.recommendations.is_empty(),
            risk_accepted: outcome.risk_accepted,
            disclaimer: DISCLAIMER,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub created_at: DateTime<Utc>,
    pub results: Option<ResultsResponse>,
}

impl From<&MixerSession> for SessionResponse {
    fn from(session: &MixerSession) -> Self {
        Self {
            id: session.id(),
            phase: session.phase(),
            created_at: session.created_at(),
            results: session.outcome().map(ResultsResponse::from),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Library items, newest first
pub async fn list_library(State(state): State<AppState>) -> AppResult<Json<Vec<LibraryItem>>> {
    Ok(Json(state.content.list_library_items().await?))
}

/// A single library item
pub async fn get_library_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LibraryItem>> {
    Ok(Json(content::library_item(state.content.as_ref(), id).await?))
}

/// Dictionary entries, optionally filtered by `q`
pub async fn search_dictionary(
    State(state): State<AppState>,
    Query(params): Query<DictionaryQuery>,
) -> AppResult<Json<Vec<DictionaryEntry>>> {
    let entries = content::search_dictionary(state.content.as_ref(), params.q.as_deref()).await?;
    Ok(Json(entries))
}

/// Complaints and supplements for the mixer form
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = load_catalog(state.catalog.as_ref()).await;
    Json(CatalogResponse {
        complaints: catalog.complaints,
        supplements: catalog.supplements,
    })
}

/// Validates a form and generates recommendations in a single request
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(form): Json<ProfileForm>,
) -> AppResult<Json<ResultsResponse>> {
    tracing::info!(
        request_id = %request_id,
        complaint_count = form.complaints.len(),
        "Processing one-shot mixer request"
    );

    let catalog = load_catalog(state.catalog.as_ref()).await;
    let mut session = MixerSession::new();
    let outcome = session.submit(
        &form,
        &catalog,
        &state.engine,
        state.history.as_ref(),
        Some(request_id.0),
    )?;

    Ok(Json(ResultsResponse::from(outcome)))
}

/// Opens a new mixer session in the collecting phase, pruning expired ones first
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let pruned = state.prune_expired_sessions(Utc::now()).await;
    if pruned > 0 {
        tracing::debug!(pruned, "Pruned expired mixer sessions");
    }

    let session = MixerSession::new();
    let response = SessionResponse::from(&session);

    let mut sessions = state.sessions.write().await;
    sessions.insert(session.id(), session);

    (StatusCode::CREATED, Json(response))
}

/// Current phase and results of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(SessionResponse::from(session)))
}

/// Submits the form for a session: Collecting -> Presenting
pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(form): Json<ProfileForm>,
) -> AppResult<Json<SessionResponse>> {
    // Load before taking the session lock; the snapshot is read-only from here on
    let catalog = load_catalog(state.catalog.as_ref()).await;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    session.submit(
        &form,
        &catalog,
        &state.engine,
        state.history.as_ref(),
        Some(request_id.0),
    )?;

    Ok(Json(SessionResponse::from(&*session)))
}

/// Clears a session back to the collecting phase
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    session.reset();
    Ok(Json(SessionResponse::from(&*session)))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Mixer session {} not found", id))
}
