use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::interview::{
    InterviewRow, INTERVIEW_COMPLETED, INTERVIEW_IN_PROGRESS, INTERVIEW_SCHEDULED,
};
use crate::models::job_post::JobPostRow;
use crate::models::organization::OrganizationRow;
use crate::models::profile::{AccountRow, ProfileRow, UserType};
use crate::store::{
    duplicate_account, DashboardStats, JobPostSummary, NewApplication, NewJobPost, NewOrganization,
    RecruitmentStore,
};

/// `RecruitmentStore` backed by the PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecruitmentStore for PgStore {
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        user_type: UserType,
    ) -> Result<ProfileRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let profile = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO profiles (email, user_type) VALUES ($1, $2) RETURNING *",
        )
        .bind(email)
        .bind(user_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => duplicate_account(email),
            other => AppError::Database(other),
        })?;

        sqlx::query("INSERT INTO credentials (user_id, password_hash) VALUES ($1, $2)")
            .bind(profile.id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(profile)
    }

    async fn find_account(&self, email: &str) -> Result<Option<AccountRow>, AppError> {
        Ok(sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT p.*, c.password_hash
            FROM profiles p
            JOIN credentials c ON c.user_id = p.id
            WHERE p.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_organization(
        &self,
        org: NewOrganization,
    ) -> Result<OrganizationRow, AppError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organization_details
                (user_id, organization_name, address, contact_person, contact_number,
                 website_link, company_description, legal_document_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                organization_name = EXCLUDED.organization_name,
                address = EXCLUDED.address,
                contact_person = EXCLUDED.contact_person,
                contact_number = EXCLUDED.contact_number,
                website_link = EXCLUDED.website_link,
                company_description = EXCLUDED.company_description,
                legal_document_url = EXCLUDED.legal_document_url,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(org.user_id)
        .bind(&org.organization_name)
        .bind(&org.address)
        .bind(&org.contact_person)
        .bind(&org.contact_number)
        .bind(&org.website_link)
        .bind(&org.company_description)
        .bind(&org.legal_document_url)
        .fetch_one(&self.pool)
        .await?;

        info!("Upserted organization details for user {}", org.user_id);
        Ok(row)
    }

    async fn get_organization_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<OrganizationRow>, AppError> {
        Ok(sqlx::query_as::<_, OrganizationRow>(
            "SELECT * FROM organization_details WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_job_post(&self, post: NewJobPost) -> Result<JobPostRow, AppError> {
        let questions: Option<Vec<String>> = (!post.pre_assessment_questions.is_empty())
            .then(|| post.pre_assessment_questions.clone());

        let row = sqlx::query_as::<_, JobPostRow>(
            r#"
            INSERT INTO job_posts
                (id, organization_id, job_title, job_description, required_skills,
                 experience_required, qualification, responsibilities, employment_type,
                 location, salary_range, benefits, pre_assessment_questions,
                 application_link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(post.id)
        .bind(post.organization_id)
        .bind(&post.job_title)
        .bind(&post.job_description)
        .bind(&post.required_skills)
        .bind(&post.experience_required)
        .bind(&post.qualification)
        .bind(&post.responsibilities)
        .bind(&post.employment_type)
        .bind(&post.location)
        .bind(&post.salary_range)
        .bind(&post.benefits)
        .bind(questions)
        .bind(&post.application_link)
        .bind(post.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted job post {} for organization {}",
            row.id, row.organization_id
        );
        Ok(row)
    }

    async fn get_job_post(&self, id: Uuid) -> Result<Option<JobPostRow>, AppError> {
        Ok(
            sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_application(&self, app: NewApplication) -> Result<ApplicationRow, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (job_post_id, candidate_id, candidate_name, candidate_email, cv_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(app.job_post_id)
        .bind(app.candidate_id)
        .bind(&app.candidate_name)
        .bind(&app.candidate_email)
        .bind(&app.cv_url)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted application {} for job post {}",
            row.id, row.job_post_id
        );
        Ok(row)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn schedule_interview(&self, application_id: Uuid) -> Result<InterviewRow, AppError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO interviews (application_id, scheduled_date, status, interview_type)
            VALUES ($1, now(), $2, 'ai')
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(INTERVIEW_SCHEDULED)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_interview(&self, application_id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT * FROM interviews
            WHERE application_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_interview_status(
        &self,
        application_id: Uuid,
        status: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE interviews
            SET status = $1, updated_at = now()
            WHERE application_id = $2 AND status <> $3
            "#,
        )
        .bind(status)
        .bind(application_id)
        .bind(INTERVIEW_COMPLETED)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn dashboard_stats(&self, organization_id: Uuid) -> Result<DashboardStats, AppError> {
        let (total_links, total_applications, total_interviews, pending, completed): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM job_posts jp WHERE jp.organization_id = $1),
                (SELECT COUNT(*) FROM applications a
                    JOIN job_posts jp ON jp.id = a.job_post_id
                    WHERE jp.organization_id = $1),
                (SELECT COUNT(*) FROM interviews i
                    JOIN applications a ON a.id = i.application_id
                    JOIN job_posts jp ON jp.id = a.job_post_id
                    WHERE jp.organization_id = $1),
                (SELECT COUNT(*) FROM interviews i
                    JOIN applications a ON a.id = i.application_id
                    JOIN job_posts jp ON jp.id = a.job_post_id
                    WHERE jp.organization_id = $1 AND i.status IN ($2, $3)),
                (SELECT COUNT(*) FROM interviews i
                    JOIN applications a ON a.id = i.application_id
                    JOIN job_posts jp ON jp.id = a.job_post_id
                    WHERE jp.organization_id = $1 AND i.status = $4)
            "#,
        )
        .bind(organization_id)
        .bind(INTERVIEW_SCHEDULED)
        .bind(INTERVIEW_IN_PROGRESS)
        .bind(INTERVIEW_COMPLETED)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_links,
            total_applications,
            total_interviews,
            pending_interviews: pending,
            completed_interviews: completed,
        })
    }

    async fn recent_job_posts(
        &self,
        organization_id: Uuid,
        limit: i64,
    ) -> Result<Vec<JobPostSummary>, AppError> {
        Ok(sqlx::query_as::<_, JobPostSummary>(
            r#"
            SELECT
                jp.id,
                jp.job_title,
                jp.application_link,
                jp.status,
                jp.created_at,
                COUNT(DISTINCT a.id) AS applications,
                COUNT(DISTINCT i.id) AS interviews
            FROM job_posts jp
            LEFT JOIN applications a ON a.job_post_id = jp.id
            LEFT JOIN interviews i ON i.application_id = a.id
            WHERE jp.organization_id = $1
            GROUP BY jp.id
            ORDER BY jp.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(organization_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
