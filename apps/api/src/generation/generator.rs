//! Challenge document generation: prompt assembly with a bloat guard, and a
//! bounded retry/timeout loop around the agent call.
//!
//! The timeout races the agent future and drops it on loss; a response that
//! would have arrived later is discarded with the attempt.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::generation::prompts::{fill_challenge_prompt, CHALLENGE_SYSTEM};
use crate::llm_client::CompletionBackend;
use crate::techstack::config::TechStackConfig;

/// A combined prompt larger than this triggers job-offer truncation.
pub const PROMPT_CHAR_LIMIT: usize = 50_000;
/// Job-offer budget after truncation kicks in.
pub const JOB_OFFER_TRUNCATION_LIMIT: usize = 20_000;
/// Literal marker appended to a truncated job offer.
pub const TRUNCATION_MARKER: &str = "[truncated]";
/// Config JSON larger than this is replaced with the default config. A
/// config outgrowing the whole job-offer budget is malformed input.
pub const CONFIG_CHAR_LIMIT: usize = 10_000;
/// Issue-description budget applied when the prompt is rebuilt.
const ISSUE_TRUNCATION_LIMIT: usize = 5_000;

const MAX_ATTEMPTS: u32 = 2;
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);
/// Inter-attempt delay grows linearly: attempt × this step.
const RETRY_DELAY_STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "Challenge generation timed out after {attempts} attempts. \
        Try again in a moment, or shorten the job offer text."
    )]
    Timeout { attempts: u32 },

    #[error(
        "The model returned an empty challenge document. \
        Try again; if this persists, the job offer may lack technical content."
    )]
    EmptyResponse,

    #[error("Challenge generation failed after {attempts} attempts: {message}")]
    Failed { attempts: u32, message: String },
}

/// Generates the challenge Markdown for a job offer.
///
/// The config string is parsed best-effort (invalid JSON becomes the default
/// config), the company description is merged in, and the prompt is rebuilt
/// with a truncated job offer if the combined size crosses the limit.
pub async fn generate_challenge(
    agent: &dyn CompletionBackend,
    job_offer_text: &str,
    json_config: &str,
    issue_description: Option<&str>,
    company_description: Option<&str>,
) -> Result<String, GenerationError> {
    let config =
        TechStackConfig::parse_lenient(json_config).with_company_description(company_description);

    let prompt = build_generation_prompt(
        job_offer_text,
        &config,
        issue_description.unwrap_or_default(),
    );

    let mut last_error: Option<GenerationError> = None;

    for attempt in 1..=MAX_ATTEMPTS {
        if attempt > 1 {
            let delay = RETRY_DELAY_STEP * (attempt - 1);
            warn!(
                "Generation attempt {} failed, retrying after {}ms",
                attempt - 1,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        match tokio::time::timeout(ATTEMPT_TIMEOUT, agent.complete(&prompt, CHALLENGE_SYSTEM)).await
        {
            Err(_) => {
                last_error = Some(GenerationError::Timeout { attempts: attempt });
            }
            Ok(Err(e)) => {
                last_error = Some(GenerationError::Failed {
                    attempts: attempt,
                    message: e.to_string(),
                });
            }
            Ok(Ok(text)) => {
                // An empty document is a failure in its own right, retried
                // like any other
                if text.trim().is_empty() {
                    last_error = Some(GenerationError::EmptyResponse);
                } else {
                    info!(
                        "Challenge generated on attempt {attempt} ({} chars)",
                        text.len()
                    );
                    return Ok(text.trim().to_string());
                }
            }
        }
    }

    Err(match last_error {
        Some(GenerationError::Timeout { .. }) => GenerationError::Timeout {
            attempts: MAX_ATTEMPTS,
        },
        Some(GenerationError::Failed { message, .. }) => GenerationError::Failed {
            attempts: MAX_ATTEMPTS,
            message,
        },
        Some(GenerationError::EmptyResponse) | None => GenerationError::EmptyResponse,
    })
}

/// Builds the generation prompt, truncating the job-offer and
/// issue-description portions when the combined prompt would exceed
/// `PROMPT_CHAR_LIMIT`. With the config clamp this keeps the final prompt
/// under the limit for any input sizes.
pub fn build_generation_prompt(
    job_offer_text: &str,
    config: &TechStackConfig,
    issue_description: &str,
) -> String {
    let mut config_json = config.to_prompt_json();
    if config_json.chars().count() > CONFIG_CHAR_LIMIT {
        warn!(
            "Config JSON is {} chars, substituting the default config",
            config_json.chars().count()
        );
        config_json = TechStackConfig::default().to_prompt_json();
    }

    let prompt = fill_challenge_prompt(job_offer_text, &config_json, issue_description);

    if prompt.chars().count() <= PROMPT_CHAR_LIMIT {
        return prompt;
    }

    warn!(
        "Prompt would be {} chars, truncating job offer to {}",
        prompt.chars().count(),
        JOB_OFFER_TRUNCATION_LIMIT
    );

    let truncated: String = job_offer_text
        .chars()
        .take(JOB_OFFER_TRUNCATION_LIMIT)
        .collect();
    let truncated = format!("{truncated}\n\n{TRUNCATION_MARKER}");
    let issue: String = issue_description
        .chars()
        .take(ISSUE_TRUNCATION_LIMIT)
        .collect();
    fill_challenge_prompt(&truncated, &config_json, &issue)
}
