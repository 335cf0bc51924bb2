//! Axum route handlers for the section-based draft editor.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cache;
use crate::drafts::store::{self, DraftUpdate};
use crate::errors::AppError;
use crate::sections::{
    is_canonical_header, mirror_fields, parse_sections, section_title, serialize_sections,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub header: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    pub header: String,
    pub body: String,
}

/// GET /api/v1/challenges/:id/sections
///
/// Recomputes the section map from the stored document. Headers missing
/// from the document are simply absent from the response.
pub async fn handle_get_sections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SectionsResponse>, AppError> {
    let draft = store::get_draft(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Challenge draft {id} not found")))?;

    let map = parse_sections(&draft.challenge_description);
    let sections = map
        .sections
        .into_iter()
        .map(|s| SectionView {
            title: section_title(&s.header).to_string(),
            header: s.header,
            body: s.body,
        })
        .collect();

    Ok(Json(SectionsResponse { sections }))
}

/// PUT /api/v1/challenges/:id/sections
///
/// Saves one section: the stored document is re-parsed, the section body
/// replaced, and the document re-serialized in canonical order. Sections 1
/// and 2 are mirrored into their dedicated columns.
pub async fn handle_update_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSectionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !is_canonical_header(&request.header) {
        return Err(AppError::Validation(format!(
            "Unknown section header: {:?}",
            request.header
        )));
    }

    let draft = store::get_draft(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Challenge draft {id} not found")))?;

    let mut map = parse_sections(&draft.challenge_description);
    map.set(&request.header, request.body.trim().to_string());
    let document = serialize_sections(&map);
    let (overview, statement) = mirror_fields(&map);

    let update = DraftUpdate {
        challenge_description: Some(document),
        challenge_problem_overview: Some(overview),
        challenge_problem_statement: Some(statement),
        name: None,
        difficulty: None,
    };
    // The draft can vanish between the fetch above and this update
    let found = store::update_draft(&state.db, id, update).await?;
    if !found {
        return Err(AppError::NotFound(format!("Challenge draft {id} not found")));
    }
    cache::invalidate_draft(&state.redis, id).await;

    info!(
        "Saved section {:?} of draft {id}",
        section_title(&request.header)
    );

    Ok(Json(serde_json::json!({ "success": true })))
}
