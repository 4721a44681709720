use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::{CandidateProfile, DocumentExtractor, DocumentKind, UploadedDocument};

/// Waits a fixed delay, then returns the same sample profile for any file.
#[derive(Debug, Clone)]
pub struct MockCvExtractor {
    delay: Duration,
}

impl MockCvExtractor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

pub fn sample_profile() -> CandidateProfile {
    CandidateProfile {
        name: "John Doe".to_string(),
        email: "john.doe@email.com".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        address: "123 Main St, New York, NY 10001".to_string(),
        education: "Bachelor of Science in Computer Science\n\
                    New York University (2018-2022)\n\
                    GPA: 3.8/4.0"
            .to_string(),
        experience: "Software Developer\n\
                     Tech Corp (2022-Present)\n\
                     • Developed web applications using React and Node.js\n\
                     • Collaborated with cross-functional teams\n\
                     • Improved application performance by 30%"
            .to_string(),
        skills: "JavaScript, React, Node.js, Python, SQL, Git, AWS, Problem Solving, \
                 Team Collaboration"
            .to_string(),
    }
}

#[async_trait]
impl DocumentExtractor for MockCvExtractor {
    async fn extract(
        &self,
        _kind: DocumentKind,
        document: &UploadedDocument,
    ) -> Result<CandidateProfile, AppError> {
        debug!(
            "Mock extraction of '{}' after {:?}",
            document.file_name, self.delay
        );
        tokio::time::sleep(self.delay).await;
        Ok(sample_profile())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_mock_waits_configured_delay() {
        let extractor = MockCvExtractor::new(Duration::from_millis(2_000));
        let document = UploadedDocument {
            file_name: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::new(),
        };

        let started = Instant::now();
        let profile = extractor
            .extract(DocumentKind::Pdf, &document)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2_000));
        assert_eq!(profile, sample_profile());
        assert!(profile.education.starts_with("Bachelor of Science"));
        assert!(profile.education.contains("\nNew York University"));
    }
}
