use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::extraction::{CandidateProfile, DocumentExtractor, DocumentKind, UploadedDocument};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("email pattern is valid")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("phone pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Education,
    Experience,
    Skills,
}

fn section_heading(line: &str) -> Option<Section> {
    let heading = line
        .trim()
        .trim_end_matches(':')
        .to_ascii_lowercase();
    match heading.as_str() {
        "education" | "academic background" => Some(Section::Education),
        "experience" | "work experience" | "professional experience" | "employment" => {
            Some(Section::Experience)
        }
        "skills" | "technical skills" | "core skills" => Some(Section::Skills),
        _ => None,
    }
}

/// Reads the text layer of a PDF and picks out contact details and the
/// education, experience and skills sections. Word documents are accepted
/// but yield an empty profile for manual entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentExtractor for PdfTextExtractor {
    async fn extract(
        &self,
        kind: DocumentKind,
        document: &UploadedDocument,
    ) -> Result<CandidateProfile, AppError> {
        if kind != DocumentKind::Pdf {
            debug!("No text extraction for '{}'", document.file_name);
            return Ok(CandidateProfile::default());
        }

        let bytes = document.bytes.clone();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::Extraction(format!("PDF reader crashed: {e}")))?
            .map_err(|e| {
                warn!("Could not read PDF '{}': {e}", document.file_name);
                AppError::Extraction(format!("Could not read PDF: {e}"))
            })?;

        Ok(profile_from_text(&text))
    }
}

/// Heuristic field extraction from plain CV text.
pub fn profile_from_text(text: &str) -> CandidateProfile {
    let mut profile = CandidateProfile::default();

    if let Some(m) = EMAIL.find(text) {
        profile.email = m.as_str().to_string();
    }
    if let Some(m) = PHONE.find(text) {
        profile.phone = m.as_str().trim().to_string();
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    // the first short line that is not contact info
    profile.name = lines
        .iter()
        .take(5)
        .find(|l| {
            section_heading(l).is_none()
                && !EMAIL.is_match(l)
                && !PHONE.is_match(l)
                && (2..=4).contains(&l.split_whitespace().count())
                && l.chars().all(|c| c.is_alphabetic() || c.is_whitespace() || c == '.' || c == '-')
        })
        .map(|l| l.to_string())
        .unwrap_or_default();

    let mut current = None;
    let mut education = Vec::new();
    let mut experience = Vec::new();
    let mut skills = Vec::new();
    for line in &lines {
        if let Some(section) = section_heading(line) {
            current = Some(section);
            continue;
        }
        match current {
            Some(Section::Education) => education.push(*line),
            Some(Section::Experience) => experience.push(*line),
            Some(Section::Skills) => skills.push(*line),
            None => {}
        }
    }
    profile.education = education.join("\n");
    profile.experience = experience.join("\n");
    profile.skills = skills.join(", ");

    profile
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    const CV: &str = "\
Jane Roe
jane.roe@example.com | +44 20 7946 0958

Education
BSc Mathematics, University of Leeds (2015-2018)

Work Experience:
Data Engineer, Widgets Ltd (2019-Present)
Built ingestion pipelines

Skills
Rust
PostgreSQL
";

    #[test]
    fn test_profile_from_text() {
        let profile = profile_from_text(CV);
        assert_eq!(profile.name, "Jane Roe");
        assert_eq!(profile.email, "jane.roe@example.com");
        assert_eq!(profile.phone, "+44 20 7946 0958");
        assert_eq!(
            profile.education,
            "BSc Mathematics, University of Leeds (2015-2018)"
        );
        assert_eq!(
            profile.experience,
            "Data Engineer, Widgets Ltd (2019-Present)\nBuilt ingestion pipelines"
        );
        assert_eq!(profile.skills, "Rust, PostgreSQL");
        assert_eq!(profile.address, "");
    }

    #[test]
    fn test_profile_from_unstructured_text() {
        let profile = profile_from_text("curriculum vitae\n\nno contact details here at all");
        assert_eq!(profile.email, "");
        assert_eq!(profile.phone, "");
        assert_eq!(profile.name, "curriculum vitae");
        assert_eq!(profile.skills, "");
    }

    #[tokio::test]
    async fn test_word_documents_yield_empty_profile() {
        let document = UploadedDocument {
            file_name: "cv.docx".to_string(),
            content_type: "application/msword".to_string(),
            bytes: Bytes::from_static(b"not really a doc"),
        };
        let profile = PdfTextExtractor
            .extract(DocumentKind::Word, &document)
            .await
            .unwrap();
        assert_eq!(profile, CandidateProfile::default());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_extraction_error() {
        let document = UploadedDocument {
            file_name: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"definitely not a pdf"),
        };
        let result = PdfTextExtractor.extract(DocumentKind::Pdf, &document).await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
