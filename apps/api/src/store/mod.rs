//! Persistence collaborator.
//!
//! Every create/read/update the accounts, wizards, interview flow and
//! dashboard need goes through `RecruitmentStore`. `AppState` carries an
//! `Arc<dyn RecruitmentStore>`; production uses `PgStore`.

pub mod postgres;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::interview::InterviewRow;
use crate::models::job_post::{JobPostRow, JobStatus};
use crate::models::organization::OrganizationRow;
use crate::models::profile::{AccountRow, ProfileRow, UserType};

pub use postgres::PgStore;

pub(crate) fn duplicate_account(email: &str) -> AppError {
    AppError::Conflict(format!("An account for {email} already exists"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
    pub user_id: Uuid,
    pub organization_name: String,
    pub address: String,
    pub contact_person: String,
    pub contact_number: String,
    pub website_link: Option<String>,
    pub company_description: Option<String>,
    pub legal_document_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobPost {
    /// Allocated before insert so the application link can embed it.
    pub id: Uuid,
    pub organization_id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub required_skills: Vec<String>,
    pub experience_required: Option<String>,
    pub qualification: Option<String>,
    pub responsibilities: Option<String>,
    pub employment_type: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub benefits: Option<String>,
    pub pre_assessment_questions: Vec<String>,
    pub application_link: String,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub job_post_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_links: i64,
    pub total_applications: i64,
    pub total_interviews: i64,
    pub pending_interviews: i64,
    pub completed_interviews: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobPostSummary {
    pub id: Uuid,
    pub job_title: String,
    pub application_link: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub applications: i64,
    pub interviews: i64,
}

#[async_trait]
pub trait RecruitmentStore: Send + Sync {
    /// Creates the profile and its credential together. A taken email is a
    /// `Conflict`.
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        user_type: UserType,
    ) -> Result<ProfileRow, AppError>;

    async fn find_account(&self, email: &str) -> Result<Option<AccountRow>, AppError>;

    /// Inserts or replaces the organization record owned by `user_id`.
    async fn upsert_organization(&self, org: NewOrganization)
        -> Result<OrganizationRow, AppError>;

    async fn get_organization_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<OrganizationRow>, AppError>;

    async fn insert_job_post(&self, post: NewJobPost) -> Result<JobPostRow, AppError>;

    async fn get_job_post(&self, id: Uuid) -> Result<Option<JobPostRow>, AppError>;

    async fn insert_application(&self, app: NewApplication) -> Result<ApplicationRow, AppError>;

    async fn get_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError>;

    /// Creates the pending AI interview for an application.
    async fn schedule_interview(&self, application_id: Uuid) -> Result<InterviewRow, AppError>;

    /// The most recent interview of the application.
    async fn get_interview(&self, application_id: Uuid) -> Result<Option<InterviewRow>, AppError>;

    /// Moves every open interview of the application to `status`.
    async fn set_interview_status(
        &self,
        application_id: Uuid,
        status: &str,
    ) -> Result<u64, AppError>;

    async fn dashboard_stats(&self, organization_id: Uuid) -> Result<DashboardStats, AppError>;

    async fn recent_job_posts(
        &self,
        organization_id: Uuid,
        limit: i64,
    ) -> Result<Vec<JobPostSummary>, AppError>;
}
