// LLM prompt constants for tech-stack extraction.

/// System prompt — enforces JSON-only output in the TechStackConfig shape.
pub const TECH_STACK_SYSTEM: &str =
    "You are an expert technical recruiter and software architect. \
    Analyze a job offer and infer the role's technology profile. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction prompt template.
/// Replace: {formatted_text}, {existing_config}, {issue_description}
pub const TECH_STACK_PROMPT_TEMPLATE: &str = r#"Analyze the following job offer and produce a technology profile for generating a coding challenge.

Return a JSON object with this EXACT schema (all fields optional except version):
{
  "version": 1,
  "role_title": "Backend Engineer",
  "seniority": "senior",
  "primary_stack": ["Rust", "PostgreSQL"],
  "secondary_stack": ["Docker", "Kafka"],
  "domain": "fintech",
  "difficulty": "medium",
  "focus_areas": ["API design", "data modeling"],
  "constraints": ["must run offline", "no external services"],
  "allowed_tools": ["any open-source library"],
  "disallowed_tools": ["AI code assistants"],
  "output_language": "en",
  "company_description": null
}

Rules:
- primary_stack: technologies the candidate will be evaluated on — the ones the job offer treats as required.
- secondary_stack: nice-to-have technologies mentioned in passing.
- seniority: "junior", "mid", "senior", "staff", "principal", or "unknown".
- difficulty: "easy", "medium", or "hard", inferred from seniority and scope.
- Merge with the existing config below: keep its values unless the job offer clearly contradicts them.

EXISTING CONFIG (may be empty):
{existing_config}

ISSUE DESCRIPTION from the hiring team (may be empty):
{issue_description}

JOB OFFER:
{formatted_text}"#;
