use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum number of pre-assessment questions a job post may carry.
pub const MAX_ASSESSMENT_QUESTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Paused,
    Closed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(JobStatus::Active),
            "paused" => Ok(JobStatus::Paused),
            "closed" => Ok(JobStatus::Closed),
            other => Err(format!("unknown job status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostRow {
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
    pub pre_assessment_questions: Option<Vec<String>>,
    pub application_link: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPostRow {
    pub fn job_status(&self) -> Option<JobStatus> {
        self.status.parse().ok()
    }
}

/// What a candidate following an application link gets to see.
#[derive(Debug, Clone, Serialize)]
pub struct PublicJobPost {
    pub id: Uuid,
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
    pub status: String,
}

impl From<JobPostRow> for PublicJobPost {
    fn from(row: JobPostRow) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title,
            job_description: row.job_description,
            required_skills: row.required_skills,
            experience_required: row.experience_required,
            qualification: row.qualification,
            responsibilities: row.responsibilities,
            employment_type: row.employment_type,
            location: row.location,
            salary_range: row.salary_range,
            benefits: row.benefits,
            pre_assessment_questions: row.pre_assessment_questions.unwrap_or_default(),
            status: row.status,
        }
    }
}

/// Splits a comma-separated skills field into a de-duplicated list.
/// Duplicates are detected case-insensitively; the first spelling wins.
pub fn parse_skills(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(String::from)
        .collect()
}
