//! Translation orchestration: input validation, chunked sequential agent
//! calls, per-call timeout + bounded retry, and a user-facing failure
//! taxonomy.
//!
//! Chunks are translated one at a time, never concurrently — ordering must
//! be preserved and rate-limit bursts avoided. The timeout races the agent
//! call; the underlying request is dropped when the race is lost.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{CompletionBackend, LlmError};
use crate::translate::chunker::split_text_into_chunks;
use crate::translate::prompts::{TRANSLATE_PROMPT_TEMPLATE, TRANSLATE_SYSTEM};

pub const MAX_INPUT_CHARS: usize = 50_000;

/// Inputs longer than this get the extended per-call timeout.
const EXTENDED_TIMEOUT_THRESHOLD: usize = 10_000;
const BASE_TIMEOUT: Duration = Duration::from_secs(30);
const EXTENDED_TIMEOUT: Duration = Duration::from_secs(90);
const MAX_ATTEMPTS: u32 = 3;

/// User-facing failure categories for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationErrorKind {
    Timeout,
    Network,
    RateLimit,
    Auth,
    InvalidInput,
    ChunkFailure,
    Unknown,
}

#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct TranslationError {
    pub kind: TranslationErrorKind,
    pub message: String,
}

impl TranslationError {
    fn new(kind: TranslationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationMetadata {
    pub original_length: usize,
    pub translated_length: usize,
    pub processing_time_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub translated_text: String,
    pub metadata: TranslationMetadata,
}

/// Translates `text` to English. Inputs at or below the chunk threshold are
/// a single agent call; larger inputs are chunked and translated strictly
/// sequentially, joined with blank lines.
pub async fn translate_text(
    agent: &dyn CompletionBackend,
    text: &str,
) -> Result<Translation, TranslationError> {
    validate_input(text)?;

    let started = Instant::now();
    let original_length = text.chars().count();
    let timeout = per_call_timeout(original_length);

    let chunks = split_text_into_chunks(text);
    let chunked = chunks.len() > 1;
    if chunked {
        info!("Translating {} chars in {} chunks", original_length, chunks.len());
    }

    let mut translated_parts = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let part = translate_chunk(agent, chunk, timeout).await.map_err(|e| {
            if chunked {
                TranslationError::new(
                    TranslationErrorKind::ChunkFailure,
                    format!("Chunk {}/{} failed: {}", index + 1, chunks.len(), e.message),
                )
            } else {
                e
            }
        })?;
        translated_parts.push(part);
    }

    let translated_text = translated_parts.join("\n\n");
    let metadata = TranslationMetadata {
        original_length,
        translated_length: translated_text.chars().count(),
        processing_time_ms: started.elapsed().as_millis(),
    };

    Ok(Translation {
        translated_text,
        metadata,
    })
}

/// Rejects empty, oversize, and whitespace/symbol-only input before any
/// agent call is made.
fn validate_input(text: &str) -> Result<(), TranslationError> {
    let len = text.chars().count();
    if text.trim().is_empty() {
        return Err(TranslationError::new(
            TranslationErrorKind::InvalidInput,
            "Text to translate must not be empty",
        ));
    }
    if len > MAX_INPUT_CHARS {
        return Err(TranslationError::new(
            TranslationErrorKind::InvalidInput,
            format!("Text exceeds the {MAX_INPUT_CHARS}-character limit ({len} given)"),
        ));
    }
    if !text.chars().any(|c| c.is_alphanumeric()) {
        return Err(TranslationError::new(
            TranslationErrorKind::InvalidInput,
            "Text contains no translatable content",
        ));
    }
    Ok(())
}

fn per_call_timeout(input_chars: usize) -> Duration {
    if input_chars > EXTENDED_TIMEOUT_THRESHOLD {
        EXTENDED_TIMEOUT
    } else {
        BASE_TIMEOUT
    }
}

/// One chunk: up to `MAX_ATTEMPTS` calls under `timeout`, exponential
/// backoff between attempts. Non-retryable agent errors surface immediately.
async fn translate_chunk(
    agent: &dyn CompletionBackend,
    chunk: &str,
    timeout: Duration,
) -> Result<String, TranslationError> {
    let prompt = TRANSLATE_PROMPT_TEMPLATE.replace("{text}", chunk);
    let mut last_error: Option<TranslationError> = None;

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "Translation attempt {} failed, retrying after {}ms",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        match tokio::time::timeout(timeout, agent.complete(&prompt, TRANSLATE_SYSTEM)).await {
            Err(_) => {
                last_error = Some(TranslationError::new(
                    TranslationErrorKind::Timeout,
                    format!("Translation call exceeded {}s", timeout.as_secs()),
                ));
            }
            Ok(Err(e)) if e.is_non_retryable() => {
                return Err(classify_llm_error(&e));
            }
            Ok(Err(e)) => {
                last_error = Some(classify_llm_error(&e));
            }
            Ok(Ok(text)) => {
                if text.trim().is_empty() {
                    last_error = Some(TranslationError::new(
                        TranslationErrorKind::Unknown,
                        "Translator returned empty output",
                    ));
                } else {
                    return Ok(text.trim().to_string());
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        TranslationError::new(TranslationErrorKind::Unknown, "Translation failed")
    }))
}

/// Maps low-level agent errors onto the user-facing taxonomy.
fn classify_llm_error(e: &LlmError) -> TranslationError {
    let kind = match e {
        LlmError::Http(_) => TranslationErrorKind::Network,
        LlmError::Api { status: 429, .. } | LlmError::RateLimited { .. } => {
            TranslationErrorKind::RateLimit
        }
        LlmError::Api {
            status: 401 | 403, ..
        } => TranslationErrorKind::Auth,
        LlmError::Api {
            status: 400 | 404, ..
        } => TranslationErrorKind::InvalidInput,
        _ => TranslationErrorKind::Unknown,
    };
    TranslationError::new(kind, e.to_string())
}
