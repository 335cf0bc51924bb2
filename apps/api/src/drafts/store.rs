//! CRUD over the `challenge_drafts` table. Updates are partial — omitted
//! fields stay untouched — and `updated_at` is refreshed on every update.
//! Concurrent saves are last-write-wins; there is no version check.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::draft::{ChallengeDraftRow, RequirementEntry};
use crate::sections::{parse_sections, SECTION_HEADERS};
use crate::techstack::config::TechStackConfig;

/// Fields for a freshly generated draft.
pub struct NewDraft {
    pub company_id: Uuid,
    pub engineer_id: Uuid,
    pub github_url: Option<String>,
    pub industry: String,
    pub name: String,
    pub challenge_description: String,
    pub difficulty: String,
    pub challenge_type: String,
    pub requirements: Vec<RequirementEntry>,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct DraftUpdate {
    pub challenge_description: Option<String>,
    pub challenge_problem_overview: Option<String>,
    pub challenge_problem_statement: Option<String>,
    pub name: Option<String>,
    pub difficulty: Option<String>,
}

/// Derives the persisted requirements list from the inferred tech stack.
pub fn requirements_from_config(config: &TechStackConfig) -> Vec<RequirementEntry> {
    config
        .primary_stack
        .iter()
        .map(|tech| RequirementEntry {
            id: Uuid::new_v4(),
            name: tech.clone(),
            description: format!("Demonstrated proficiency with {tech}"),
        })
        .collect()
}

/// Inserts a draft with status `draft` and returns its generated id. The
/// problem overview and statement columns are filled from the document's
/// first two sections at insert time.
pub async fn create_draft(pool: &PgPool, draft: NewDraft) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let sections = parse_sections(&draft.challenge_description);
    let overview = sections.get(SECTION_HEADERS[0]).map(str::to_string);
    let statement = sections.get(SECTION_HEADERS[1]).map(str::to_string);
    let requirements = serde_json::to_value(&draft.requirements)?;

    sqlx::query(
        r#"
        INSERT INTO challenge_drafts
            (id, company_id, engineer_id, github_url, industry, name,
             challenge_description, challenge_problem_overview,
             challenge_problem_statement, difficulty, challenge_type,
             status, requirements, candidates)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'draft', $12, '[]'::jsonb)
        "#,
    )
    .bind(id)
    .bind(draft.company_id)
    .bind(draft.engineer_id)
    .bind(&draft.github_url)
    .bind(&draft.industry)
    .bind(&draft.name)
    .bind(&draft.challenge_description)
    .bind(&overview)
    .bind(&statement)
    .bind(&draft.difficulty)
    .bind(&draft.challenge_type)
    .bind(&requirements)
    .execute(pool)
    .await?;

    info!("Created challenge draft {id} for company {}", draft.company_id);
    Ok(id)
}

/// Zero-or-one lookup. `None` means the draft does not exist — callers map
/// this to a not-found response, distinct from a database error.
pub async fn get_draft(pool: &PgPool, id: Uuid) -> Result<Option<ChallengeDraftRow>, sqlx::Error> {
    sqlx::query_as::<_, ChallengeDraftRow>("SELECT * FROM challenge_drafts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_drafts(
    pool: &PgPool,
    company_id: Option<Uuid>,
) -> Result<Vec<ChallengeDraftRow>, sqlx::Error> {
    match company_id {
        Some(company_id) => {
            sqlx::query_as::<_, ChallengeDraftRow>(
                "SELECT * FROM challenge_drafts WHERE company_id = $1 ORDER BY updated_at DESC",
            )
            .bind(company_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ChallengeDraftRow>(
                "SELECT * FROM challenge_drafts ORDER BY updated_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

/// Applies a partial update. Returns false when the draft does not exist.
/// `updated_at` is always refreshed, even for a no-op update.
pub async fn update_draft(pool: &PgPool, id: Uuid, update: DraftUpdate) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE challenge_drafts SET
            challenge_description = COALESCE($2, challenge_description),
            challenge_problem_overview = COALESCE($3, challenge_problem_overview),
            challenge_problem_statement = COALESCE($4, challenge_problem_statement),
            name = COALESCE($5, name),
            difficulty = COALESCE($6, difficulty),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&update.challenge_description)
    .bind(&update.challenge_problem_overview)
    .bind(&update.challenge_problem_statement)
    .bind(&update.name)
    .bind(&update.difficulty)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a draft. Deletion is always an explicit user action.
pub async fn delete_draft(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM challenge_drafts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_derived_from_primary_stack() {
        let config = TechStackConfig {
            primary_stack: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            ..Default::default()
        };
        let requirements = requirements_from_config(&config);
        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].name, "Rust");
        assert!(requirements[0].description.contains("Rust"));
        assert_ne!(requirements[0].id, requirements[1].id);
    }

    #[test]
    fn test_empty_stack_yields_no_requirements() {
        assert!(requirements_from_config(&TechStackConfig::default()).is_empty());
    }

    #[test]
    fn test_default_update_changes_nothing_but_timestamp() {
        let update = DraftUpdate::default();
        assert!(update.challenge_description.is_none());
        assert!(update.name.is_none());
        assert!(update.difficulty.is_none());
    }
}
