//! Authentication collaborator: accounts through `RecruitmentStore`,
//! sessions in Redis.
//!
//! Handlers never read ambient state; they receive a `Session` (or one of the
//! role-gated wrappers) resolved once per request by the extractors below.

pub mod accounts;
pub mod extract;
pub mod handlers;
pub mod password;
pub mod sessions;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserType;

pub use extract::{BearerToken, CandidateSession, CurrentSession, OrganizationSession};
pub use sessions::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub user_type: UserType,
}

impl Session {
    /// Fails with `Forbidden` when the session belongs to the other role.
    pub fn require_role(self, role: UserType) -> Result<Session, AppError> {
        if self.user_type == role {
            Ok(self)
        } else {
            Err(AppError::Forbidden)
        }
    }
}
