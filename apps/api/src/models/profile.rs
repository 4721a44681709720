use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::routes::pages::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Candidate,
    Organization,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Candidate => "candidate",
            UserType::Organization => "organization",
        }
    }

    /// Where an unauthenticated user of this role is sent.
    pub fn login_page(self) -> Page {
        match self {
            UserType::Candidate => Page::CandidateLogin,
            UserType::Organization => Page::OrganizationLogin,
        }
    }

    /// Where a freshly signed-in user of this role lands.
    pub fn home_page(self) -> Page {
        match self {
            UserType::Candidate => Page::CvUpload,
            UserType::Organization => Page::OrganizationDashboard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A profile joined with its stored password hash.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    #[sqlx(flatten)]
    pub profile: ProfileRow,
    pub password_hash: String,
}
