//! In-memory `RecruitmentStore` that records every call. Test-only.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::interview::{InterviewRow, INTERVIEW_COMPLETED, INTERVIEW_SCHEDULED};
use crate::models::job_post::JobPostRow;
use crate::models::organization::OrganizationRow;
use crate::models::profile::{AccountRow, ProfileRow, UserType};
use crate::store::{
    duplicate_account, DashboardStats, JobPostSummary, NewApplication, NewJobPost, NewOrganization,
    RecruitmentStore,
};

#[derive(Default)]
struct Inner {
    calls: Vec<&'static str>,
    accounts: HashMap<String, AccountRow>,
    organizations: HashMap<Uuid, OrganizationRow>,
    job_posts: HashMap<Uuid, JobPostRow>,
    applications: HashMap<Uuid, ApplicationRow>,
    interviews: Vec<InterviewRow>,
    fail_with: Option<String>,
}

#[derive(Default)]
pub struct RecordingStore {
    inner: Mutex<Inner>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a database-style error.
    pub fn fail_with(&self, message: &str) {
        self.inner.lock().unwrap().fail_with = Some(message.to_string());
    }

    pub fn recover(&self) {
        self.inner.lock().unwrap().fail_with = None;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn organization_for(&self, user_id: Uuid) -> Option<OrganizationRow> {
        self.inner.lock().unwrap().organizations.get(&user_id).cloned()
    }

    pub fn job_posts(&self) -> Vec<JobPostRow> {
        self.inner.lock().unwrap().job_posts.values().cloned().collect()
    }

    pub fn applications(&self) -> Vec<ApplicationRow> {
        self.inner.lock().unwrap().applications.values().cloned().collect()
    }

    pub fn interviews(&self) -> Vec<InterviewRow> {
        self.inner.lock().unwrap().interviews.clone()
    }

    pub fn seed_job_post(&self, organization_id: Uuid, status: &str) -> JobPostRow {
        let id = Uuid::new_v4();
        let row = JobPostRow {
            id,
            organization_id,
            job_title: "Backend Engineer".to_string(),
            job_description: "Build services".to_string(),
            required_skills: vec!["Rust".to_string()],
            experience_required: None,
            qualification: None,
            responsibilities: None,
            employment_type: None,
            location: None,
            salary_range: None,
            benefits: None,
            pre_assessment_questions: None,
            application_link: format!("https://selectra.app/apply/{id}"),
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.inner.lock().unwrap().job_posts.insert(id, row.clone());
        row
    }

    pub fn seed_application(&self, job_post_id: Uuid, candidate_id: Uuid) -> ApplicationRow {
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            job_post_id,
            candidate_id: Some(candidate_id),
            candidate_name: "Jane Roe".to_string(),
            candidate_email: "jane@example.com".to_string(),
            cv_url: None,
            status: "pending".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .applications
            .insert(row.id, row.clone());
        row
    }

    fn record(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, Inner>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if let Some(message) = inner.fail_with.clone() {
            return Err(AppError::Database(sqlx::Error::Protocol(message)));
        }
        Ok(inner)
    }
}

#[async_trait]
impl RecruitmentStore for RecordingStore {
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        user_type: UserType,
    ) -> Result<ProfileRow, AppError> {
        let mut inner = self.record("create_account")?;
        if inner.accounts.contains_key(email) {
            return Err(duplicate_account(email));
        }
        let now = Utc::now();
        let profile = ProfileRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            user_type,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.insert(
            email.to_string(),
            AccountRow {
                profile: profile.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(profile)
    }

    async fn find_account(&self, email: &str) -> Result<Option<AccountRow>, AppError> {
        let inner = self.record("find_account")?;
        Ok(inner.accounts.get(email).cloned())
    }

    async fn upsert_organization(
        &self,
        org: NewOrganization,
    ) -> Result<OrganizationRow, AppError> {
        let mut inner = self.record("upsert_organization")?;
        let now = Utc::now();
        let id = inner
            .organizations
            .get(&org.user_id)
            .map(|existing| existing.id)
            .unwrap_or_else(Uuid::new_v4);
        let row = OrganizationRow {
            id,
            user_id: org.user_id,
            organization_name: org.organization_name,
            address: org.address,
            contact_person: org.contact_person,
            contact_number: org.contact_number,
            website_link: org.website_link,
            company_description: org.company_description,
            legal_document_url: org.legal_document_url,
            created_at: now,
            updated_at: now,
        };
        inner.organizations.insert(row.user_id, row.clone());
        Ok(row)
    }

    async fn get_organization_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<OrganizationRow>, AppError> {
        let inner = self.record("get_organization_for_user")?;
        Ok(inner.organizations.get(&user_id).cloned())
    }

    async fn insert_job_post(&self, post: NewJobPost) -> Result<JobPostRow, AppError> {
        let mut inner = self.record("insert_job_post")?;
        let now = Utc::now();
        let row = JobPostRow {
            id: post.id,
            organization_id: post.organization_id,
            job_title: post.job_title,
            job_description: post.job_description,
            required_skills: post.required_skills,
            experience_required: post.experience_required,
            qualification: post.qualification,
            responsibilities: post.responsibilities,
            employment_type: post.employment_type,
            location: post.location,
            salary_range: post.salary_range,
            benefits: post.benefits,
            pre_assessment_questions: (!post.pre_assessment_questions.is_empty())
                .then_some(post.pre_assessment_questions),
            application_link: post.application_link,
            status: post.status.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.job_posts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_job_post(&self, id: Uuid) -> Result<Option<JobPostRow>, AppError> {
        let inner = self.record("get_job_post")?;
        Ok(inner.job_posts.get(&id).cloned())
    }

    async fn insert_application(&self, app: NewApplication) -> Result<ApplicationRow, AppError> {
        let mut inner = self.record("insert_application")?;
        let now = Utc::now();
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            job_post_id: app.job_post_id,
            candidate_id: Some(app.candidate_id),
            candidate_name: app.candidate_name,
            candidate_email: app.candidate_email,
            cv_url: app.cv_url,
            status: "pending".to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.applications.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        let inner = self.record("get_application")?;
        Ok(inner.applications.get(&id).cloned())
    }

    async fn schedule_interview(&self, application_id: Uuid) -> Result<InterviewRow, AppError> {
        let mut inner = self.record("schedule_interview")?;
        let now = Utc::now();
        let row = InterviewRow {
            id: Uuid::new_v4(),
            application_id,
            scheduled_date: Some(now),
            status: INTERVIEW_SCHEDULED.to_string(),
            interview_type: Some("ai".to_string()),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        inner.interviews.push(row.clone());
        Ok(row)
    }

    async fn get_interview(&self, application_id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        let inner = self.record("get_interview")?;
        Ok(inner
            .interviews
            .iter()
            .rev()
            .find(|i| i.application_id == application_id)
            .cloned())
    }

    async fn set_interview_status(
        &self,
        application_id: Uuid,
        status: &str,
    ) -> Result<u64, AppError> {
        let mut inner = self.record("set_interview_status")?;
        let mut touched = 0;
        for interview in inner
            .interviews
            .iter_mut()
            .filter(|i| i.application_id == application_id && i.status != INTERVIEW_COMPLETED)
        {
            interview.status = status.to_string();
            touched += 1;
        }
        Ok(touched)
    }

    async fn dashboard_stats(&self, organization_id: Uuid) -> Result<DashboardStats, AppError> {
        let inner = self.record("dashboard_stats")?;
        let posts: Vec<Uuid> = inner
            .job_posts
            .values()
            .filter(|p| p.organization_id == organization_id)
            .map(|p| p.id)
            .collect();
        let apps: Vec<Uuid> = inner
            .applications
            .values()
            .filter(|a| posts.contains(&a.job_post_id))
            .map(|a| a.id)
            .collect();
        let interviews: Vec<&InterviewRow> = inner
            .interviews
            .iter()
            .filter(|i| apps.contains(&i.application_id))
            .collect();
        Ok(DashboardStats {
            total_links: posts.len() as i64,
            total_applications: apps.len() as i64,
            total_interviews: interviews.len() as i64,
            pending_interviews: interviews
                .iter()
                .filter(|i| i.status != INTERVIEW_COMPLETED)
                .count() as i64,
            completed_interviews: interviews
                .iter()
                .filter(|i| i.status == INTERVIEW_COMPLETED)
                .count() as i64,
        })
    }

    async fn recent_job_posts(
        &self,
        organization_id: Uuid,
        limit: i64,
    ) -> Result<Vec<JobPostSummary>, AppError> {
        let inner = self.record("recent_job_posts")?;
        let mut posts: Vec<&JobPostRow> = inner
            .job_posts
            .values()
            .filter(|p| p.organization_id == organization_id)
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|p| {
                let apps: Vec<Uuid> = inner
                    .applications
                    .values()
                    .filter(|a| a.job_post_id == p.id)
                    .map(|a| a.id)
                    .collect();
                JobPostSummary {
                    id: p.id,
                    job_title: p.job_title.clone(),
                    application_link: p.application_link.clone(),
                    status: p.status.clone(),
                    created_at: p.created_at,
                    applications: apps.len() as i64,
                    interviews: inner
                        .interviews
                        .iter()
                        .filter(|i| apps.contains(&i.application_id))
                        .count() as i64,
                }
            })
            .collect())
    }
}
