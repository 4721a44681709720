use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::{CandidateSession, Session};
use crate::errors::AppError;
use crate::interview::session::InterviewSnapshot;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

/// The application, provided it belongs to the signed-in candidate.
async fn owned_application(
    state: &AppState,
    session: &Session,
    application_id: Uuid,
) -> Result<ApplicationRow, AppError> {
    let application = state
        .store
        .get_application(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    if application.candidate_id != Some(session.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(application)
}

/// GET /api/v1/interviews/:application_id
pub async fn handle_get(
    State(state): State<AppState>,
    CandidateSession(session): CandidateSession,
    Path(application_id): Path<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    owned_application(&state, &session, application_id).await?;
    Ok(Json(state.interviews.snapshot(application_id).await?))
}

/// POST /api/v1/interviews/:application_id/start
pub async fn handle_start(
    State(state): State<AppState>,
    CandidateSession(session): CandidateSession,
    Path(application_id): Path<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    owned_application(&state, &session, application_id).await?;
    Ok(Json(state.interviews.start(application_id).await?))
}

/// POST /api/v1/interviews/:application_id/next
pub async fn handle_next(
    State(state): State<AppState>,
    CandidateSession(session): CandidateSession,
    Path(application_id): Path<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    owned_application(&state, &session, application_id).await?;
    Ok(Json(state.interviews.next_question(application_id).await?))
}

/// POST /api/v1/interviews/:application_id/end
pub async fn handle_end(
    State(state): State<AppState>,
    CandidateSession(session): CandidateSession,
    Path(application_id): Path<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    owned_application(&state, &session, application_id).await?;
    Ok(Json(state.interviews.end(application_id).await?))
}

/// DELETE /api/v1/interviews/:application_id
///
/// Drops the live session and its timers; the stored interview row is kept,
/// so a completed interview stays completed.
pub async fn handle_discard(
    State(state): State<AppState>,
    CandidateSession(session): CandidateSession,
    Path(application_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_application(&state, &session, application_id).await?;
    if state.interviews.remove(application_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No live interview for application {application_id}"
        )))
    }
}
