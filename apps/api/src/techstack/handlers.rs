//! Axum route handlers for tech-stack extraction.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::techstack::config::TechStackConfig;
use crate::techstack::extractor::extract_tech_stack;

#[derive(Debug, Deserialize)]
pub struct TechStackRequest {
    pub formatted_text: String,
    #[serde(default)]
    pub existing_config: String,
    #[serde(default)]
    pub issue_description: String,
}

#[derive(Debug, Serialize)]
pub struct TechStackResponse {
    pub success: bool,
    pub tech_stack: Vec<String>,
    pub config: TechStackConfig,
}

/// POST /api/v1/tech-stack
///
/// An unsuccessful extraction is not an HTTP error: the response carries an
/// empty stack and the caller's config, and generation can still proceed.
pub async fn handle_extract_tech_stack(
    State(state): State<AppState>,
    Json(request): Json<TechStackRequest>,
) -> Result<Json<TechStackResponse>, AppError> {
    if request.formatted_text.trim().is_empty() {
        return Err(AppError::Validation(
            "formatted_text cannot be empty".to_string(),
        ));
    }

    let outcome = extract_tech_stack(
        &state.llm,
        &request.formatted_text,
        &request.existing_config,
        &request.issue_description,
    )
    .await;

    Ok(Json(TechStackResponse {
        success: outcome.success,
        tech_stack: outcome.tech_stack,
        config: outcome.config,
    }))
}
