//! Axum route handlers for the extraction API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::parse::{extract_text, validate_upload, ExtractionMetadata, ERR_FILE_MISSING};
use crate::state::AppState;

/// Extraction result envelope. `success=false` carries the reason in
/// `error`; the HTTP status stays 200 — a bad file is not a server fault.
#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    pub success: bool,
    pub file_name: String,
    pub file_type: String,
    pub file_size: usize,
    pub extracted_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExtractionMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResponse {
    fn failure(file_name: String, file_type: String, file_size: usize, error: String) -> Self {
        Self {
            success: false,
            file_name,
            file_type,
            file_size,
            extracted_text: String::new(),
            metadata: None,
            error: Some(error),
        }
    }
}

/// POST /api/v1/extract
///
/// Multipart upload with a single `file` part. Validates type and size,
/// extracts plain text, and best-effort archives the original to S3.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResponse>, AppError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((file_name, content_type, bytes.to_vec()));
            break;
        }
    }

    let Some((file_name, content_type, bytes)) = upload else {
        return Ok(Json(ExtractionResponse::failure(
            String::new(),
            String::new(),
            0,
            ERR_FILE_MISSING.to_string(),
        )));
    };

    let file_size = bytes.len();

    if let Err(e) = validate_upload(&content_type, file_size) {
        return Ok(Json(ExtractionResponse::failure(
            file_name,
            content_type,
            file_size,
            e.code().to_string(),
        )));
    }

    let (extracted_text, mut metadata) = match extract_text(&content_type, &bytes) {
        Ok(result) => result,
        Err(e) => {
            warn!("Extraction failed for {file_name}: {e}");
            return Ok(Json(ExtractionResponse::failure(
                file_name,
                content_type,
                file_size,
                e.to_string(),
            )));
        }
    };

    metadata.storage_key = archive_original(&state, &file_name, &content_type, bytes).await;

    info!(
        "Extracted {} chars from {file_name} ({})",
        metadata.char_count, metadata.extraction_method
    );

    Ok(Json(ExtractionResponse {
        success: true,
        file_name,
        file_type: content_type,
        file_size,
        extracted_text,
        metadata: Some(metadata),
        error: None,
    }))
}

/// Archives the original upload under `uploads/{id}/{name}`. Best-effort:
/// a storage failure is logged, not surfaced — the extraction result is
/// what the caller came for.
async fn archive_original(
    state: &AppState,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Option<String> {
    let key = format!("uploads/{}/{}", Uuid::new_v4(), file_name);
    match state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(aws_sdk_s3::primitives::ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
    {
        Ok(_) => {
            info!("Archived upload to s3://{}/{}", state.config.s3_bucket, key);
            Some(key)
        }
        Err(e) => {
            warn!("Failed to archive upload {file_name}: {e}");
            None
        }
    }
}
