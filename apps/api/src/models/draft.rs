use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted challenge draft. `challenge_description` is the full
/// generated Markdown document; `challenge_problem_overview` and
/// `challenge_problem_statement` mirror sections 1 and 2 for list views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChallengeDraftRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub engineer_id: Uuid,
    pub github_url: Option<String>,
    pub industry: String,
    pub name: String,
    pub challenge_description: String,
    pub challenge_problem_overview: Option<String>,
    pub challenge_problem_statement: Option<String>,
    pub difficulty: String,
    pub challenge_type: String,
    pub status: String,
    /// JSONB list of `RequirementEntry`.
    pub requirements: Value,
    /// JSONB list of `CandidateEntry`.
    pub candidates: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One technical requirement attached to a draft, derived from the
/// tech-stack config at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementEntry {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// A candidate assigned to a challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub score: Option<f64>,
    pub evaluation_id: Option<Uuid>,
}
