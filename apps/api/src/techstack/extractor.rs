//! Tech-stack extraction orchestration: one agent call, parsed as a
//! `TechStackConfig`; if the output is not valid JSON the keyword fallback
//! scrapes technology names out of the raw text instead. An agent failure
//! yields an empty, unsuccessful outcome rather than an error — generation
//! can proceed with whatever config the caller already had.

use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, CompletionBackend};
use crate::techstack::config::TechStackConfig;
use crate::techstack::keywords::extract_keywords;
use crate::techstack::prompts::{TECH_STACK_PROMPT_TEMPLATE, TECH_STACK_SYSTEM};

/// Agent output shorter than this is noise, not a config.
const MIN_USABLE_OUTPUT_CHARS: usize = 10;

/// Result of a tech-stack extraction run. `success=false` never aborts the
/// pipeline; it means the config carries only what the caller supplied.
#[derive(Debug, Clone)]
pub struct TechStackOutcome {
    pub config: TechStackConfig,
    pub tech_stack: Vec<String>,
    pub success: bool,
}

/// Infers a tech-stack config from formatted job-offer text. The existing
/// config string (possibly empty or invalid) seeds the result; the issue
/// description steers the agent.
pub async fn extract_tech_stack(
    agent: &dyn CompletionBackend,
    formatted_text: &str,
    existing_config: &str,
    issue_description: &str,
) -> TechStackOutcome {
    let existing = TechStackConfig::parse_lenient(existing_config);

    let prompt = TECH_STACK_PROMPT_TEMPLATE
        .replace("{existing_config}", &existing.to_prompt_json())
        .replace("{issue_description}", issue_description)
        .replace("{formatted_text}", formatted_text);

    let raw = match agent.complete(&prompt, TECH_STACK_SYSTEM).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Tech-stack agent call failed: {e}");
            return TechStackOutcome {
                config: existing,
                tech_stack: Vec::new(),
                success: false,
            };
        }
    };

    if raw.trim().chars().count() < MIN_USABLE_OUTPUT_CHARS {
        warn!("Tech-stack agent returned unusably short output");
        return TechStackOutcome {
            config: existing,
            tech_stack: Vec::new(),
            success: false,
        };
    }

    match serde_json::from_str::<TechStackConfig>(strip_json_fences(&raw)) {
        Ok(config) => {
            info!(
                "Tech stack extracted: {} primary, {} secondary",
                config.primary_stack.len(),
                config.secondary_stack.len()
            );
            let tech_stack = config.primary_stack.clone();
            TechStackOutcome {
                config,
                tech_stack,
                success: true,
            }
        }
        Err(e) => {
            // Structured parse unavailable — scrape the agent text instead
            warn!("Tech-stack output was not valid JSON ({e}), using keyword fallback");
            let tech_stack = extract_keywords(&raw);
            let mut config = existing;
            if !tech_stack.is_empty() {
                config.primary_stack = tech_stack.clone();
            }
            let success = !tech_stack.is_empty();
            TechStackOutcome {
                config,
                tech_stack,
                success,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm_client::LlmError;

    /// Agent that replays a fixed sequence of results and records prompts.
    struct ScriptedAgent {
        responses: Mutex<Vec<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedAgent {
        fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedAgent {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    #[tokio::test]
    async fn test_structured_output_is_authoritative() {
        let agent = ScriptedAgent::new(vec![Ok(r#"{
            "version": 1,
            "role_title": "Data Engineer",
            "primary_stack": ["Python", "PostgreSQL", "Spark"]
        }"#
        .to_string())]);

        let outcome = extract_tech_stack(&agent, "job offer text", "", "scaling data pipeline").await;
        assert!(outcome.success);
        assert_eq!(outcome.tech_stack, vec!["Python", "PostgreSQL", "Spark"]);
        assert_eq!(outcome.config.role_title.as_deref(), Some("Data Engineer"));
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let agent = ScriptedAgent::new(vec![Ok(
            "```json\n{\"version\": 1, \"primary_stack\": [\"Rust\"]}\n```".to_string(),
        )]);
        let outcome = extract_tech_stack(&agent, "text", "", "").await;
        assert!(outcome.success);
        assert_eq!(outcome.tech_stack, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back_to_keywords() {
        let agent = ScriptedAgent::new(vec![Ok(
            "The role needs these.\nTech stack: Rust, PostgreSQL, Redis".to_string(),
        )]);
        let outcome = extract_tech_stack(&agent, "text", "", "").await;
        assert!(outcome.success);
        assert!(outcome.tech_stack.contains(&"Rust".to_string()));
        assert!(outcome.tech_stack.contains(&"Redis".to_string()));
        assert_eq!(outcome.config.primary_stack, outcome.tech_stack);
    }

    #[tokio::test]
    async fn test_agent_failure_yields_empty_unsuccessful_outcome() {
        let agent = ScriptedAgent::new(vec![Err(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        })]);
        let outcome = extract_tech_stack(&agent, "text", "", "").await;
        assert!(!outcome.success);
        assert!(outcome.tech_stack.is_empty());
    }

    #[tokio::test]
    async fn test_too_short_output_is_unsuccessful() {
        let agent = ScriptedAgent::new(vec![Ok("ok".to_string())]);
        let outcome = extract_tech_stack(&agent, "text", "", "").await;
        assert!(!outcome.success);
        assert!(outcome.tech_stack.is_empty());
    }

    #[tokio::test]
    async fn test_existing_config_seeds_prompt_and_fallback() {
        let agent = ScriptedAgent::new(vec![Ok("not json at all, no technologies".to_string())]);
        let existing = r#"{"version": 1, "seniority": "senior", "primary_stack": ["Go"]}"#;
        let outcome = extract_tech_stack(&agent, "text", existing, "").await;

        // Fallback found nothing, so the existing stack is preserved
        assert!(!outcome.success);
        assert_eq!(outcome.config.primary_stack, vec!["Go"]);
        assert_eq!(outcome.config.seniority.as_deref(), Some("senior"));

        let prompts = agent.prompts.lock().unwrap();
        assert!(prompts[0].contains("senior"));
    }

    #[tokio::test]
    async fn test_invalid_existing_config_is_treated_as_default() {
        let agent = ScriptedAgent::new(vec![Ok(
            r#"{"version": 1, "primary_stack": ["Rust"]}"#.to_string()
        )]);
        let outcome = extract_tech_stack(&agent, "text", "{invalid", "").await;
        assert!(outcome.success);
        assert_eq!(outcome.tech_stack, vec!["Rust"]);
    }
}
