//! Axum route handlers for challenge drafts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache;
use crate::drafts::store::{self, DraftUpdate};
use crate::errors::AppError;
use crate::models::draft::ChallengeDraftRow;
use crate::sections::{mirror_fields, parse_sections, serialize_sections};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DraftListResponse {
    pub drafts: Vec<ChallengeDraftRow>,
}

/// Partial update body. Field names match the persistence contract;
/// omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateDraftRequest {
    pub challenge_description: Option<String>,
    pub challenge_problem_overview: Option<String>,
    pub challenge_problem_statement: Option<String>,
    pub challenge_name: Option<String>,
    pub challenge_difficulty: Option<String>,
}

/// GET /api/v1/challenges
pub async fn handle_list_drafts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DraftListResponse>, AppError> {
    let drafts = store::list_drafts(&state.db, query.company_id).await?;
    Ok(Json(DraftListResponse { drafts }))
}

/// GET /api/v1/challenges/:id
///
/// Read-through cached: serves the redis copy when present, otherwise loads
/// from the database and populates the cache.
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cached) = cache::get_draft_json(&state.redis, id).await {
        return Ok((
            StatusCode::OK,
            [("content-type", "application/json")],
            cached,
        ));
    }

    let draft = store::get_draft(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Challenge draft {id} not found")))?;

    let json = serde_json::to_string(&draft)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize draft: {e}")))?;
    cache::put_draft_json(&state.redis, id, &json).await;

    Ok((StatusCode::OK, [("content-type", "application/json")], json))
}

/// PATCH /api/v1/challenges/:id
///
/// A whole-document save normalizes the description to canonical section
/// order and refreshes the mirrored overview/statement columns.
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDraftRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut update = DraftUpdate {
        challenge_description: None,
        challenge_problem_overview: request.challenge_problem_overview,
        challenge_problem_statement: request.challenge_problem_statement,
        name: request.challenge_name,
        difficulty: request.challenge_difficulty,
    };

    if let Some(description) = request.challenge_description {
        let sections = parse_sections(&description);
        update.challenge_description = Some(serialize_sections(&sections));
        let (overview, statement) = mirror_fields(&sections);
        if update.challenge_problem_overview.is_none() {
            update.challenge_problem_overview = Some(overview);
        }
        if update.challenge_problem_statement.is_none() {
            update.challenge_problem_statement = Some(statement);
        }
    }

    let found = store::update_draft(&state.db, id, update).await?;
    if !found {
        return Err(AppError::NotFound(format!("Challenge draft {id} not found")));
    }

    cache::invalidate_draft(&state.redis, id).await;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/v1/challenges/:id
pub async fn handle_delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let found = store::delete_draft(&state.db, id).await?;
    if !found {
        return Err(AppError::NotFound(format!("Challenge draft {id} not found")));
    }

    cache::invalidate_draft(&state.redis, id).await;

    Ok(Json(serde_json::json!({ "success": true })))
}
