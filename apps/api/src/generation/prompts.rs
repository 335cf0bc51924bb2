// LLM prompt constants for challenge generation.
//
// The document template interpolates `sections::SECTION_HEADERS`, so the
// prompt and the section parser share one source of truth for the document
// shape.

use crate::sections::SECTION_HEADERS;

/// System prompt — Markdown document only, in the canonical shape.
pub const CHALLENGE_SYSTEM: &str =
    "You are an expert technical interviewer designing take-home coding \
    challenges. Produce a single Markdown document and nothing else. \
    Do NOT wrap the document in code fences. \
    Do NOT include commentary before or after the document.";

/// Challenge generation prompt template.
/// Replace: {section_headers}, {job_offer}, {config_json}, {issue_description}
const CHALLENGE_PROMPT_TEMPLATE: &str = r#"Design a take-home coding challenge for the role described below.

The document MUST contain exactly these six section headers, verbatim, in this order:
{section_headers}

Rules:
- Ground every requirement in the job offer and the technology profile below.
- Scope the challenge to 4-8 hours of focused work for the stated seniority.
- Requirements must be concrete and verifiable; the rubric must total 100%.
- Write in the output_language from the profile (default English).

TECHNOLOGY PROFILE:
{config_json}

ISSUE DESCRIPTION from the hiring team (may be empty):
{issue_description}

JOB OFFER:
{job_offer}"#;

/// Fills the template. The job offer is interpolated last so a truncated
/// offer cannot clobber other placeholders.
pub fn fill_challenge_prompt(job_offer: &str, config_json: &str, issue_description: &str) -> String {
    CHALLENGE_PROMPT_TEMPLATE
        .replace("{section_headers}", &SECTION_HEADERS.join("\n"))
        .replace("{config_json}", config_json)
        .replace("{issue_description}", issue_description)
        .replace("{job_offer}", job_offer)
}
