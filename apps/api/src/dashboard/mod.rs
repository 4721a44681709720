//! Organization dashboard summary.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::OrganizationSession;
use crate::errors::AppError;
use crate::models::organization::OrganizationRow;
use crate::state::AppState;
use crate::store::{DashboardStats, JobPostSummary, RecruitmentStore};

pub const RECENT_POSTS: i64 = 10;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    /// `None` until the organization step of the intake wizard was saved.
    pub organization: Option<OrganizationRow>,
    pub stats: DashboardStats,
    pub recent_job_posts: Vec<JobPostSummary>,
}

/// Totals and the most recent job posts of the organization signed in as
/// `user_id`. Job posts are keyed by the organization's profile id.
pub async fn build_summary(
    store: &dyn RecruitmentStore,
    user_id: Uuid,
) -> Result<DashboardSummary, AppError> {
    Ok(DashboardSummary {
        organization: store.get_organization_for_user(user_id).await?,
        stats: store.dashboard_stats(user_id).await?,
        recent_job_posts: store.recent_job_posts(user_id, RECENT_POSTS).await?,
    })
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    OrganizationSession(session): OrganizationSession,
) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(build_summary(state.store.as_ref(), session.user_id).await?))
}
