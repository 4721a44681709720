use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const INTERVIEW_SCHEDULED: &str = "scheduled";
pub const INTERVIEW_IN_PROGRESS: &str = "in_progress";
pub const INTERVIEW_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub status: String,
    pub interview_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
