//! Side effects attached to wizard steps.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_post::{parse_skills, JobStatus};
use crate::store::{NewApplication, NewJobPost, NewOrganization};
use crate::wizard::definition::{StepAction, StepContext};
use crate::wizard::state::WizardState;

pub const QUESTIONS_LIST: &str = "pre_assessment_questions";

const ORGANIZATION_REF: &str = "organization_id";
const JOB_POST_REF: &str = "job_post_id";
const APPLICATION_REF: &str = "application_id";

/// Saves the organization record owned by the signed-in user.
pub struct UpsertOrganization;

#[async_trait]
impl StepAction for UpsertOrganization {
    fn name(&self) -> &'static str {
        "upsert_organization"
    }

    async fn perform(
        &self,
        ctx: &StepContext<'_>,
        draft: &mut WizardState,
    ) -> Result<(), AppError> {
        let row = ctx
            .store
            .upsert_organization(NewOrganization {
                user_id: ctx.session.user_id,
                organization_name: draft.field("organization_name").to_string(),
                address: draft.field("address").to_string(),
                contact_person: draft.field("contact_person").to_string(),
                contact_number: draft.field("contact_number").to_string(),
                website_link: draft.optional_field("website_link"),
                company_description: draft.optional_field("company_description"),
                legal_document_url: draft.optional_field("legal_document_url"),
            })
            .await?;

        draft.refs.insert(ORGANIZATION_REF.to_string(), row.id);
        Ok(())
    }
}

/// Creates the active job post and its shareable application link.
pub struct PublishJobPost;

#[async_trait]
impl StepAction for PublishJobPost {
    fn name(&self) -> &'static str {
        "publish_job_post"
    }

    async fn perform(
        &self,
        ctx: &StepContext<'_>,
        draft: &mut WizardState,
    ) -> Result<(), AppError> {
        // job posts belong to the organization's profile, not its details row
        let organization_id = ctx.session.user_id;

        let id = Uuid::new_v4();
        let application_link = ctx.links.issue(id).await?;
        let questions = draft
            .lists
            .get(QUESTIONS_LIST)
            .map(|list| list.non_blank())
            .unwrap_or_default();

        let row = ctx
            .store
            .insert_job_post(NewJobPost {
                id,
                organization_id,
                job_title: draft.field("job_title").to_string(),
                job_description: draft.field("job_description").to_string(),
                required_skills: parse_skills(draft.field("required_skills")),
                experience_required: draft.optional_field("experience_required"),
                qualification: draft.optional_field("qualification"),
                responsibilities: draft.optional_field("responsibilities"),
                employment_type: draft.optional_field("employment_type"),
                location: draft.optional_field("location"),
                salary_range: draft.optional_field("salary_range"),
                benefits: draft.optional_field("benefits"),
                pre_assessment_questions: questions,
                application_link,
                status: JobStatus::Active,
            })
            .await?;

        info!("Published job post {} ({})", row.id, row.job_title);
        draft.refs.insert(JOB_POST_REF.to_string(), row.id);
        draft.artifact = Some(row.application_link);
        Ok(())
    }
}

/// Files the candidate's application and schedules their AI interview.
///
/// The two writes are not transactional; a failed schedule after a
/// successful insert leaves an application without an interview.
pub struct SubmitApplication;

#[async_trait]
impl StepAction for SubmitApplication {
    fn name(&self) -> &'static str {
        "submit_application"
    }

    async fn perform(
        &self,
        ctx: &StepContext<'_>,
        draft: &mut WizardState,
    ) -> Result<(), AppError> {
        let job_post_id: Uuid = draft
            .field("job_post_id")
            .parse()
            .map_err(|_| AppError::Validation("Invalid job post id".to_string()))?;

        let job = ctx
            .store
            .get_job_post(job_post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job post {job_post_id} not found")))?;
        if job.job_status() != Some(JobStatus::Active) {
            return Err(AppError::Validation(
                "This job post is no longer accepting applications".to_string(),
            ));
        }

        let application = ctx
            .store
            .insert_application(NewApplication {
                job_post_id,
                candidate_id: ctx.session.user_id,
                candidate_name: draft.field("name").to_string(),
                candidate_email: draft.field("email").to_string(),
                cv_url: draft.optional_field("cv_url"),
            })
            .await?;
        ctx.store.schedule_interview(application.id).await?;

        info!(
            "Candidate {} applied to job post {} (application {})",
            ctx.session.user_id, job_post_id, application.id
        );
        draft
            .refs
            .insert(APPLICATION_REF.to_string(), application.id);
        draft.artifact = Some(application.id.to_string());
        Ok(())
    }
}
