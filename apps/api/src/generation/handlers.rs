//! Axum route handler for the full generation pipeline.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::drafts::store::{self, NewDraft};
use crate::errors::AppError;
use crate::generation::pipeline::{run_pipeline, PipelineInput, PipelineOutcome, ProcessingStep};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateChallengeResponse {
    pub steps: Vec<ProcessingStep>,
    pub progress: u8,
    pub artifacts: crate::generation::pipeline::PipelineArtifacts,
    /// Id of the auto-saved draft when the run and the save both succeeded.
    pub draft_id: Option<Uuid>,
    /// Run-level error from the step that halted the pipeline.
    pub error: Option<String>,
    /// Auto-save failure. Secondary and non-fatal: the generated document
    /// is still in `artifacts`.
    pub save_error: Option<String>,
}

/// Collected multipart fields for a generation request.
#[derive(Debug, Default)]
struct GenerateForm {
    file: Option<(String, String, Vec<u8>)>,
    company_id: Option<Uuid>,
    engineer_id: Option<Uuid>,
    name: Option<String>,
    industry: Option<String>,
    github_url: Option<String>,
    issue_description: String,
    existing_config: String,
    company_description: Option<String>,
}

/// POST /api/v1/challenges/generate
///
/// Runs the four-step pipeline over the uploaded job posting and, on
/// success, auto-saves the draft. A save failure does not revert the
/// Generate step — it is reported separately in `save_error`.
pub async fn handle_generate_challenge(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateChallengeResponse>, AppError> {
    let form = read_form(multipart).await?;

    let Some((file_name, content_type, bytes)) = form.file else {
        return Err(AppError::Validation("A job posting file is required".to_string()));
    };
    let company_id = form
        .company_id
        .ok_or_else(|| AppError::Validation("company_id is required".to_string()))?;
    let engineer_id = form
        .engineer_id
        .ok_or_else(|| AppError::Validation("engineer_id is required".to_string()))?;

    let input = PipelineInput {
        file_name,
        content_type,
        bytes,
        existing_config: form.existing_config,
        issue_description: form.issue_description,
        company_description: form.company_description,
    };

    let PipelineOutcome {
        run,
        artifacts,
        error,
    } = run_pipeline(&state.llm, input).await;

    let mut draft_id = None;
    let mut save_error = None;

    if let Some(markdown) = &artifacts.challenge_markdown {
        let config = artifacts.config.clone().unwrap_or_default();
        let draft = NewDraft {
            company_id,
            engineer_id,
            github_url: form.github_url,
            industry: form.industry.unwrap_or_else(|| "general".to_string()),
            name: form
                .name
                .or_else(|| config.role_title.clone())
                .unwrap_or_else(|| "Generated challenge".to_string()),
            challenge_description: markdown.clone(),
            difficulty: config.difficulty.clone().unwrap_or_else(|| "medium".to_string()),
            challenge_type: "takehome".to_string(),
            requirements: store::requirements_from_config(&config),
        };

        match store::create_draft(&state.db, draft).await {
            Ok(id) => {
                info!("Auto-saved challenge draft {id}");
                draft_id = Some(id);
            }
            Err(e) => {
                // The generated document is not discarded; the client can
                // retry the save with the returned artifacts
                error!("Auto-save failed after generation: {e}");
                save_error = Some(format!("Draft could not be saved: {e}"));
            }
        }
    }

    Ok(Json(GenerateChallengeResponse {
        progress: run.progress_percent(),
        steps: run.steps,
        artifacts,
        draft_id,
        error,
        save_error,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                form.file = Some((file_name, content_type, bytes.to_vec()));
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read field {other}: {e}")))?;
                match other {
                    "company_id" => {
                        form.company_id = Some(parse_uuid_field("company_id", &value)?);
                    }
                    "engineer_id" => {
                        form.engineer_id = Some(parse_uuid_field("engineer_id", &value)?);
                    }
                    "name" => form.name = non_empty(value),
                    "industry" => form.industry = non_empty(value),
                    "github_url" => form.github_url = non_empty(value),
                    "issue_description" => form.issue_description = value,
                    "existing_config" => form.existing_config = value,
                    "company_description" => form.company_description = non_empty(value),
                    _ => {} // unknown fields are ignored
                }
            }
        }
    }

    Ok(form)
}

fn parse_uuid_field(name: &str, value: &str) -> Result<Uuid, AppError> {
    value
        .trim()
        .parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("{name} must be a valid UUID")))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
