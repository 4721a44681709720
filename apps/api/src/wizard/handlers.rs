use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentSession, Session};
use crate::errors::AppError;
use crate::routes::pages::Page;
use crate::state::AppState;
use crate::wizard::definition::{StepContext, StepView};
use crate::wizard::engine::StepSubmission;
use crate::wizard::state::{WizardKind, WizardState};

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemRequest {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct WizardView {
    #[serde(flatten)]
    pub state: WizardState,
    pub step: StepView,
    /// Set once the wizard is complete.
    pub redirect: Option<Page>,
}

impl WizardView {
    pub fn of(state: &WizardState) -> Result<Self, AppError> {
        let step = state.kind.definition().step(state.current_step)?;
        Ok(Self {
            state: state.clone(),
            step: StepView::of(state.current_step, step),
            redirect: state
                .is_complete()
                .then(|| state.kind.completion_page()),
        })
    }
}

fn session_for(current: CurrentSession, kind: WizardKind) -> Result<Session, AppError> {
    current.require(kind.role())
}

/// POST /api/v1/wizards/:flow
pub async fn handle_start(
    State(state): State<AppState>,
    Path(kind): Path<WizardKind>,
    current: CurrentSession,
    body: Option<Json<StartRequest>>,
) -> Result<(StatusCode, Json<WizardView>), AppError> {
    let session = session_for(current, kind)?;
    let seed = body.map(|Json(req)| req.fields).unwrap_or_default();

    let wizard = state.wizards.start(session.user_id, kind, seed).await?;
    let view = WizardView::of(&*wizard.lock().await)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/wizards/:flow
pub async fn handle_get(
    State(state): State<AppState>,
    Path(kind): Path<WizardKind>,
    current: CurrentSession,
) -> Result<Json<WizardView>, AppError> {
    let session = session_for(current, kind)?;
    let wizard = state.wizards.get(session.user_id, kind).await?;
    let view = WizardView::of(&*wizard.lock().await)?;
    Ok(Json(view))
}

/// DELETE /api/v1/wizards/:flow
pub async fn handle_discard(
    State(state): State<AppState>,
    Path(kind): Path<WizardKind>,
    current: CurrentSession,
) -> Result<StatusCode, AppError> {
    let session = session_for(current, kind)?;
    if state.wizards.discard(session.user_id, kind).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No {} wizard in progress",
            kind.as_str()
        )))
    }
}

/// POST /api/v1/wizards/:flow/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(kind): Path<WizardKind>,
    current: CurrentSession,
    Json(submission): Json<StepSubmission>,
) -> Result<Json<WizardView>, AppError> {
    let session = session_for(current, kind)?;
    let wizard = state.wizards.get(session.user_id, kind).await?;
    let mut wizard = wizard.lock().await;

    let ctx = StepContext {
        session: &session,
        store: state.store.as_ref(),
        links: state.links.as_ref(),
    };
    kind.definition()
        .submit_step(&mut wizard, submission, &ctx)
        .await?;

    Ok(Json(WizardView::of(&wizard)?))
}

/// POST /api/v1/wizards/:flow/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(kind): Path<WizardKind>,
    current: CurrentSession,
) -> Result<Json<WizardView>, AppError> {
    let session = session_for(current, kind)?;
    let wizard = state.wizards.get(session.user_id, kind).await?;
    let mut wizard = wizard.lock().await;

    kind.definition().go_back(&mut wizard);
    Ok(Json(WizardView::of(&wizard)?))
}

/// POST /api/v1/wizards/:flow/lists/:list
pub async fn handle_add_item(
    State(state): State<AppState>,
    Path((kind, list)): Path<(WizardKind, String)>,
    current: CurrentSession,
    body: Option<Json<ItemRequest>>,
) -> Result<Json<WizardView>, AppError> {
    let session = session_for(current, kind)?;
    let value = body.map(|Json(req)| req.value).unwrap_or_default();
    let wizard = state.wizards.get(session.user_id, kind).await?;
    let mut wizard = wizard.lock().await;

    kind.definition().add_item(&mut wizard, &list, value)?;
    Ok(Json(WizardView::of(&wizard)?))
}

/// PUT /api/v1/wizards/:flow/lists/:list/:index
pub async fn handle_update_item(
    State(state): State<AppState>,
    Path((kind, list, index)): Path<(WizardKind, String, usize)>,
    current: CurrentSession,
    Json(req): Json<ItemRequest>,
) -> Result<Json<WizardView>, AppError> {
    let session = session_for(current, kind)?;
    let wizard = state.wizards.get(session.user_id, kind).await?;
    let mut wizard = wizard.lock().await;

    kind.definition()
        .update_item(&mut wizard, &list, index, req.value)?;
    Ok(Json(WizardView::of(&wizard)?))
}

/// DELETE /api/v1/wizards/:flow/lists/:list/:index
pub async fn handle_remove_item(
    State(state): State<AppState>,
    Path((kind, list, index)): Path<(WizardKind, String, usize)>,
    current: CurrentSession,
) -> Result<Json<WizardView>, AppError> {
    let session = session_for(current, kind)?;
    let wizard = state.wizards.get(session.user_id, kind).await?;
    let mut wizard = wizard.lock().await;

    kind.definition().remove_item(&mut wizard, &list, index)?;
    Ok(Json(WizardView::of(&wizard)?))
}
