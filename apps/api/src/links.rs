//! Application link issuance.
//!
//! `AppState` holds an `Arc<dyn LinkIssuer>` so a shortener or signed-link
//! service can replace the default without touching the wizard.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait LinkIssuer: Send + Sync {
    /// Returns the shareable URL for a job post.
    async fn issue(&self, job_post_id: Uuid) -> Result<String, AppError>;
}

/// Builds `{base_url}/apply/{job_post_id}`.
#[derive(Debug, Clone)]
pub struct BaseUrlLinkIssuer {
    base_url: String,
}

impl BaseUrlLinkIssuer {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LinkIssuer for BaseUrlLinkIssuer {
    async fn issue(&self, job_post_id: Uuid) -> Result<String, AppError> {
        Ok(format!("{}/apply/{}", self.base_url, job_post_id))
    }
}
