//! CV processing: file-type gate, pluggable field extraction, and the
//! upload endpoint that feeds the CV intake wizard.

pub mod handlers;
pub mod mock;
pub mod pdf;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::config::{Config, ExtractorBackend};
use crate::errors::AppError;
use crate::wizard::state::{WizardKind, WizardState};

pub use mock::MockCvExtractor;
pub use pdf::PdfTextExtractor;

/// Largest CV accepted by the upload endpoint.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a PDF or DOC file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
}

impl DocumentKind {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Word => "doc",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Candidate details pulled out of a CV. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub education: String,
    pub experience: String,
    pub skills: String,
}

impl CandidateProfile {
    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
            ("education", self.education.as_str()),
            ("experience", self.experience.as_str()),
            ("skills", self.skills.as_str()),
        ]
    }

    /// Replaces the wizard's profile fields; a blank value clears the field
    /// so nothing from an earlier CV survives.
    pub fn fill(&self, state: &mut WizardState) {
        for (name, value) in self.entries() {
            let value = value.trim();
            if value.is_empty() {
                state.fields.remove(name);
            } else {
                state.fields.insert(name.to_string(), value.to_string());
            }
        }
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        kind: DocumentKind,
        document: &UploadedDocument,
    ) -> Result<CandidateProfile, AppError>;
}

/// Accepts content types mentioning `pdf` or `doc` (covers .doc and .docx).
pub fn validate_document(content_type: &str) -> Result<DocumentKind, AppError> {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("pdf") {
        Ok(DocumentKind::Pdf)
    } else if content_type.contains("doc") {
        Ok(DocumentKind::Word)
    } else {
        Err(AppError::UnsupportedMediaType(
            UNSUPPORTED_FILE_MESSAGE.to_string(),
        ))
    }
}

/// Fails unless `state` is a CV intake wizard still on its upload step.
pub fn ensure_upload_step(state: &WizardState) -> Result<(), AppError> {
    state.ensure_editable()?;
    if state.kind != WizardKind::CvIntake || state.current_step != 1 {
        return Err(AppError::Validation(
            "A CV can only be processed on the upload step".to_string(),
        ));
    }
    Ok(())
}

fn apply_profile(state: &mut WizardState, profile: &CandidateProfile, cv_url: Option<String>) {
    profile.fill(state);
    match cv_url {
        Some(url) => state.fields.insert("cv_url".to_string(), url),
        None => state.fields.remove("cv_url"),
    };
}

/// Validates the document, runs the extractor, stores the file through
/// `store_cv` and fills the wizard.
///
/// `store_cv` only runs once extraction succeeded. On any error the
/// wizard's fields and step are left untouched.
pub async fn process_file<F, Fut>(
    state: &mut WizardState,
    document: &UploadedDocument,
    extractor: &dyn DocumentExtractor,
    store_cv: F,
) -> Result<CandidateProfile, AppError>
where
    F: FnOnce(DocumentKind) -> Fut,
    Fut: Future<Output = Result<Option<String>, AppError>>,
{
    let kind = validate_document(&document.content_type)?;
    ensure_upload_step(state)?;

    let profile = extractor.extract(kind, document).await?;
    let cv_url = store_cv(kind).await?;
    apply_profile(state, &profile, cv_url);

    info!(
        "Processed CV '{}' ({} bytes)",
        document.file_name,
        document.bytes.len()
    );
    Ok(profile)
}

pub fn build_extractor(config: &Config) -> Arc<dyn DocumentExtractor> {
    match config.cv_extractor {
        ExtractorBackend::Mock => Arc::new(MockCvExtractor::new(Duration::from_millis(
            config.mock_extraction_delay_ms,
        ))),
        ExtractorBackend::Pdf => Arc::new(PdfTextExtractor),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn document(content_type: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: "cv.bin".to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    fn stored_at(
        url: Option<&'static str>,
    ) -> impl FnOnce(DocumentKind) -> std::future::Ready<Result<Option<String>, AppError>> {
        move |_| std::future::ready(Ok(url.map(String::from)))
    }

    fn cv_wizard() -> WizardState {
        WizardKind::CvIntake
            .definition()
            .start(BTreeMap::new())
            .unwrap()
    }

    #[test]
    fn test_validate_document_types() {
        assert_eq!(validate_document("application/pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(validate_document("application/msword").unwrap(), DocumentKind::Word);
        assert_eq!(
            validate_document(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )
            .unwrap(),
            DocumentKind::Word
        );
        assert!(matches!(
            validate_document("text/plain"),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_png_is_rejected_without_side_effects() {
        let mut state = cv_wizard();
        let before = state.clone();
        let extractor = MockCvExtractor::new(Duration::from_millis(2_000));

        let err = process_file(&mut state, &document("image/png"), &extractor, stored_at(None))
            .await
            .unwrap_err();

        match err {
            AppError::UnsupportedMediaType(msg) => assert_eq!(msg, UNSUPPORTED_FILE_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(state, before);
        assert!(state.fields.is_empty());
        assert_eq!(state.current_step, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pdf_fills_fields_without_advancing() {
        let mut state = cv_wizard();
        let extractor = MockCvExtractor::new(Duration::from_millis(2_000));

        let profile = process_file(
            &mut state,
            &document("application/pdf"),
            &extractor,
            stored_at(Some("cvs/u/1.pdf")),
        )
        .await
        .unwrap();

        assert_eq!(profile.name, "John Doe");
        assert_eq!(state.field("email"), "john.doe@email.com");
        assert_eq!(state.field("cv_url"), "cvs/u/1.pdf");
        assert_eq!(state.current_step, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extraction_refused_after_upload_step() {
        let mut state = cv_wizard();
        state.current_step = 2;
        let extractor = MockCvExtractor::new(Duration::from_millis(2_000));

        let result =
            process_file(&mut state, &document("application/pdf"), &extractor, stored_at(None))
                .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(state.fields.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_leaves_wizard_untouched() {
        let mut state = cv_wizard();
        let before = state.clone();
        let extractor = MockCvExtractor::new(Duration::from_millis(2_000));

        let result = process_file(&mut state, &document("application/pdf"), &extractor, |_| {
            std::future::ready(Err(AppError::Storage("bucket unavailable".to_string())))
        })
        .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_fill_replaces_previous_values() {
        let mut state = cv_wizard();
        state.fields.insert("phone".to_string(), "555".to_string());
        CandidateProfile {
            name: " Jane ".to_string(),
            ..Default::default()
        }
        .fill(&mut state);

        assert_eq!(state.field("name"), "Jane");
        assert!(!state.fields.contains_key("phone"));
        assert!(!state.fields.contains_key("email"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reupload_with_blank_profile_clears_earlier_cv() {
        let mut state = cv_wizard();
        let mock = MockCvExtractor::new(Duration::from_millis(2_000));
        process_file(
            &mut state,
            &document("application/pdf"),
            &mock,
            stored_at(Some("cvs/u/1.pdf")),
        )
        .await
        .unwrap();
        assert_eq!(state.field("name"), "John Doe");

        // the pdf backend reads nothing out of Word files
        let profile = process_file(
            &mut state,
            &document("application/msword"),
            &PdfTextExtractor,
            stored_at(Some("cvs/u/2.doc")),
        )
        .await
        .unwrap();

        assert_eq!(profile, CandidateProfile::default());
        assert!(!state.fields.contains_key("name"));
        assert!(!state.fields.contains_key("email"));
        assert_eq!(state.field("cv_url"), "cvs/u/2.doc");
    }
}
