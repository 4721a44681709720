use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::CandidateSession;
use crate::errors::AppError;
use crate::extraction::{
    process_file, validate_document, CandidateProfile, DocumentKind, UploadedDocument,
    MAX_UPLOAD_BYTES,
};
use crate::state::AppState;
use crate::wizard::handlers::WizardView;
use crate::wizard::state::WizardKind;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub cv_url: String,
    pub profile: CandidateProfile,
    pub wizard: WizardView,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(too_large_message())
    } else {
        AppError::Validation(format!("Invalid upload: {e}"))
    }
}

fn too_large_message() -> String {
    format!("CV must be {} MB or smaller", MAX_UPLOAD_BYTES / (1024 * 1024))
}

/// `cvs/{user_id}/{uuid}.{ext}`, keeping a recognised extension from the
/// original file name.
pub fn cv_key(user_id: Uuid, kind: DocumentKind, file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .filter(|ext| ["pdf", "doc", "docx"].contains(&ext.as_str()))
        .unwrap_or_else(|| kind.extension().to_string());
    format!("cvs/{}/{}.{}", user_id, Uuid::new_v4(), ext)
}

async fn read_document(multipart: &mut Multipart) -> Result<UploadedDocument, AppError> {
    let mut document = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            field.bytes().await.map_err(multipart_error)?;
            continue;
        }
        let file_name = field.file_name().unwrap_or("cv").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        document = Some(UploadedDocument {
            file_name,
            content_type,
            bytes,
        });
    }
    document.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))
}

async fn store_cv(
    state: &AppState,
    user_id: Uuid,
    kind: DocumentKind,
    document: &UploadedDocument,
) -> Result<Option<String>, AppError> {
    let key = cv_key(user_id, kind, &document.file_name);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(document.bytes.clone()))
        .content_type(&document.content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("CV upload failed: {e}")))?;

    info!("Uploaded CV to s3://{}/{}", state.config.s3_bucket, key);
    Ok(Some(key))
}

/// POST /api/v1/cv/upload
///
/// Reads the CV, stores it in S3 and fills the caller's CV intake wizard
/// from it. Nothing is stored when extraction fails.
pub async fn handle_upload(
    State(state): State<AppState>,
    CandidateSession(session): CandidateSession,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let document = read_document(&mut multipart).await?;
    if document.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(too_large_message()));
    }
    validate_document(&document.content_type)?;

    let wizard = state
        .wizards
        .get(session.user_id, WizardKind::CvIntake)
        .await?;
    let mut wizard = wizard.lock().await;

    let profile = process_file(
        &mut wizard,
        &document,
        state.extractor.as_ref(),
        |kind| store_cv(&state, session.user_id, kind, &document),
    )
    .await?;

    Ok(Json(UploadResponse {
        cv_url: wizard.field("cv_url").to_string(),
        profile,
        wizard: WizardView::of(&wizard)?,
    }))
}
