pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::drafts::handlers as draft_handlers;
use crate::extraction::handlers as extraction_handlers;
use crate::generation::handlers as generation_handlers;
use crate::sections::handlers as section_handlers;
use crate::state::AppState;
use crate::techstack::handlers as techstack_handlers;
use crate::translate::handlers as translate_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pipeline stages, individually addressable
        .route("/api/v1/extract", post(extraction_handlers::handle_extract))
        .route("/api/v1/translate", post(translate_handlers::handle_translate))
        .route(
            "/api/v1/tech-stack",
            post(techstack_handlers::handle_extract_tech_stack),
        )
        // Full generation run
        .route(
            "/api/v1/challenges/generate",
            post(generation_handlers::handle_generate_challenge),
        )
        // Draft CRUD + section editor
        .route("/api/v1/challenges", get(draft_handlers::handle_list_drafts))
        .route(
            "/api/v1/challenges/:id",
            get(draft_handlers::handle_get_draft)
                .patch(draft_handlers::handle_update_draft)
                .delete(draft_handlers::handle_delete_draft),
        )
        .route(
            "/api/v1/challenges/:id/sections",
            get(section_handlers::handle_get_sections)
                .put(section_handlers::handle_update_section),
        )
        .with_state(state)
}
