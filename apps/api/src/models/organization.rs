use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_name: String,
    pub address: String,
    pub contact_person: String,
    pub contact_number: String,
    pub website_link: Option<String>,
    pub company_description: Option<String>,
    pub legal_document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
