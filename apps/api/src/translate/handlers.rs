//! Axum route handlers for the translation API.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::translate::translator::{
    translate_text, TranslationErrorKind, TranslationMetadata,
};

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
}

/// Translation envelope. Failures after validation are reported with their
/// taxonomy kind rather than an HTTP error — the caller decides whether to
/// retry.
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TranslationMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<TranslationErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/v1/translate
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    match translate_text(&state.llm, &request.text).await {
        Ok(translation) => Ok(Json(TranslateResponse {
            success: true,
            translated_text: Some(translation.translated_text),
            metadata: Some(translation.metadata),
            error_kind: None,
            error: None,
        })),
        Err(e) if e.kind == TranslationErrorKind::InvalidInput => {
            Err(AppError::Validation(e.message))
        }
        Err(e) => Ok(Json(TranslateResponse {
            success: false,
            translated_text: None,
            metadata: None,
            error_kind: Some(e.kind),
            error: Some(e.message),
        })),
    }
}
