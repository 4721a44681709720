use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_post::{JobStatus, PublicJobPost};
use crate::state::AppState;
use crate::store::RecruitmentStore;

/// An active job post as shown to applicants.
pub async fn public_job_post(
    store: &dyn RecruitmentStore,
    id: Uuid,
) -> Result<PublicJobPost, AppError> {
    let post = store
        .get_job_post(id)
        .await?
        .filter(|p| p.job_status() == Some(JobStatus::Active))
        .ok_or_else(|| AppError::NotFound(format!("Job post {id} not found")))?;
    Ok(post.into())
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicJobPost>, AppError> {
    Ok(Json(public_job_post(state.store.as_ref(), id).await?))
}
