//! Pipeline state machine for a single generation run.
//!
//! Four sequential steps: Extract → Translate → TechStack → Generate. Step
//! statuses move pending → in_progress → (completed | error), never
//! backwards, and a step may not start until every earlier step completed.
//! A failure halts the remaining steps; artifacts produced by completed
//! steps stay in the outcome for diagnosis.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::extraction::parse::{extract_text, validate_upload};
use crate::generation::generator::generate_challenge;
use crate::llm_client::CompletionBackend;
use crate::techstack::config::TechStackConfig;
use crate::techstack::extractor::extract_tech_stack;
use crate::translate::translator::translate_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Extract,
    Translate,
    TechStack,
    Generate,
}

pub const STEP_ORDER: [StepId; 4] = [
    StepId::Extract,
    StepId::Translate,
    StepId::TechStack,
    StepId::Generate,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingStep {
    pub id: StepId,
    pub name: &'static str,
    pub description: &'static str,
    pub status: StepStatus,
}

impl ProcessingStep {
    fn new(id: StepId) -> Self {
        let (name, description) = match id {
            StepId::Extract => ("Extract", "Extract plain text from the uploaded file"),
            StepId::Translate => ("Translate", "Translate the job offer to English"),
            StepId::TechStack => ("Tech Stack", "Infer the role's technology profile"),
            StepId::Generate => ("Generate", "Generate the challenge document"),
        };
        Self {
            id,
            name,
            description,
            status: StepStatus::Pending,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("step {0:?} cannot start: an earlier step has not completed")]
    EarlierStepIncomplete(StepId),
    #[error("step {0:?} cannot move {1:?} -> {2:?}")]
    InvalidTransition(StepId, StepStatus, StepStatus),
}

/// Step state for one generation run. Freshly initialized per run; not
/// shared across runs.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub steps: Vec<ProcessingStep>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            steps: STEP_ORDER.iter().map(|id| ProcessingStep::new(*id)).collect(),
        }
    }

    fn index(&self, id: StepId) -> usize {
        STEP_ORDER.iter().position(|s| *s == id).unwrap_or(0)
    }

    /// Marks a step in-progress. Rejected unless the step is pending and
    /// every earlier step completed.
    pub fn start(&mut self, id: StepId) -> Result<(), TransitionError> {
        let index = self.index(id);
        if self.steps[..index]
            .iter()
            .any(|s| s.status != StepStatus::Completed)
        {
            return Err(TransitionError::EarlierStepIncomplete(id));
        }
        self.transition(id, StepStatus::InProgress)
    }

    pub fn complete(&mut self, id: StepId) -> Result<(), TransitionError> {
        self.transition(id, StepStatus::Completed)
    }

    pub fn fail(&mut self, id: StepId) -> Result<(), TransitionError> {
        self.transition(id, StepStatus::Error)
    }

    fn transition(&mut self, id: StepId, next: StepStatus) -> Result<(), TransitionError> {
        let index = self.index(id);
        let current = self.steps[index].status;
        let allowed = matches!(
            (current, next),
            (StepStatus::Pending, StepStatus::InProgress)
                | (StepStatus::InProgress, StepStatus::Completed)
                | (StepStatus::InProgress, StepStatus::Error)
        );
        if !allowed {
            return Err(TransitionError::InvalidTransition(id, current, next));
        }
        self.steps[index].status = next;
        Ok(())
    }

    /// Aggregate progress: completed steps over total, as a percentage.
    pub fn progress_percent(&self) -> u8 {
        let completed = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count();
        (completed * 100 / self.steps.len()) as u8
    }
}

/// Inputs for one full pipeline run.
#[derive(Debug)]
pub struct PipelineInput {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub existing_config: String,
    pub issue_description: String,
    pub company_description: Option<String>,
}

/// Intermediate artifacts, populated step by step. Present even when a later
/// step failed so callers can inspect what the run produced.
#[derive(Debug, Default, Serialize)]
pub struct PipelineArtifacts {
    pub extracted_text: Option<String>,
    pub translated_text: Option<String>,
    pub tech_stack: Vec<String>,
    pub config: Option<TechStackConfig>,
    pub challenge_markdown: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PipelineOutcome {
    pub run: PipelineRun,
    pub artifacts: PipelineArtifacts,
    /// Run-level error from the step that halted the pipeline.
    pub error: Option<String>,
}

impl PipelineOutcome {
    fn halted(run: PipelineRun, artifacts: PipelineArtifacts, error: String) -> Self {
        Self {
            run,
            artifacts,
            error: Some(error),
        }
    }
}

/// Drives the four pipeline steps serially. Each stage's output feeds the
/// next; the first failure marks its step as errored and stops the run.
/// Persistence of the generated document is the caller's concern.
pub async fn run_pipeline(agent: &dyn CompletionBackend, input: PipelineInput) -> PipelineOutcome {
    let mut run = PipelineRun::new();
    let mut artifacts = PipelineArtifacts::default();

    // Step 1: Extract
    if let Err(e) = run.start(StepId::Extract) {
        return PipelineOutcome::halted(run, artifacts, e.to_string());
    }
    let extracted = validate_upload(&input.content_type, input.bytes.len())
        .and_then(|()| extract_text(&input.content_type, &input.bytes));
    let extracted_text = match extracted {
        Ok((text, _meta)) => text,
        Err(e) => {
            let _ = run.fail(StepId::Extract);
            error!("Pipeline halted at Extract: {e}");
            return PipelineOutcome::halted(run, artifacts, e.to_string());
        }
    };
    artifacts.extracted_text = Some(extracted_text.clone());
    let _ = run.complete(StepId::Extract);

    // Step 2: Translate
    if let Err(e) = run.start(StepId::Translate) {
        return PipelineOutcome::halted(run, artifacts, e.to_string());
    }
    let translated = match translate_text(agent, &extracted_text).await {
        Ok(t) => t.translated_text,
        Err(e) => {
            let _ = run.fail(StepId::Translate);
            error!("Pipeline halted at Translate: {e}");
            return PipelineOutcome::halted(run, artifacts, e.to_string());
        }
    };
    artifacts.translated_text = Some(translated.clone());
    let _ = run.complete(StepId::Translate);

    // Step 3: Tech stack. An extraction failure does not halt the run: the
    // step completes with an empty stack and generation uses the caller's
    // config.
    if let Err(e) = run.start(StepId::TechStack) {
        return PipelineOutcome::halted(run, artifacts, e.to_string());
    }
    let outcome = extract_tech_stack(
        agent,
        &translated,
        &input.existing_config,
        &input.issue_description,
    )
    .await;
    let config = outcome
        .config
        .with_company_description(input.company_description.as_deref());
    artifacts.tech_stack = outcome.tech_stack;
    artifacts.config = Some(config.clone());
    let _ = run.complete(StepId::TechStack);

    // Step 4: Generate
    if let Err(e) = run.start(StepId::Generate) {
        return PipelineOutcome::halted(run, artifacts, e.to_string());
    }
    let markdown = match generate_challenge(
        agent,
        &translated,
        &config.to_prompt_json(),
        Some(&input.issue_description),
        input.company_description.as_deref(),
    )
    .await
    {
        Ok(doc) => doc,
        Err(e) => {
            let _ = run.fail(StepId::Generate);
            error!("Pipeline halted at Generate: {e}");
            return PipelineOutcome::halted(run, artifacts, e.to_string());
        }
    };
    artifacts.challenge_markdown = Some(markdown);
    let _ = run.complete(StepId::Generate);

    info!("Pipeline completed for {}", input.file_name);
    PipelineOutcome {
        run,
        artifacts,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm_client::LlmError;
    use crate::sections::SECTION_HEADERS;

    fn canonical_document() -> String {
        SECTION_HEADERS
            .iter()
            .map(|h| format!("{h}\n\nbody\n\n"))
            .collect()
    }

    fn text_input(body: &str) -> PipelineInput {
        PipelineInput {
            file_name: "posting.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: body.as_bytes().to_vec(),
            existing_config: String::new(),
            issue_description: "scaling data pipeline".to_string(),
            company_description: Some("A data platform company.".to_string()),
        }
    }

    /// Routes each call by system prompt: translation echoes, tech-stack
    /// returns a config, generation returns the canonical document.
    struct RoutingAgent {
        fail_stage: Option<&'static str>,
        seen_systems: Mutex<Vec<String>>,
    }

    impl RoutingAgent {
        fn ok() -> Self {
            Self {
                fail_stage: None,
                seen_systems: Mutex::new(Vec::new()),
            }
        }

        fn failing_at(stage: &'static str) -> Self {
            Self {
                fail_stage: Some(stage),
                seen_systems: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for RoutingAgent {
        async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
            self.seen_systems.lock().unwrap().push(system.to_string());
            let stage = if system.contains("translator") {
                "translate"
            } else if system.contains("recruiter") {
                "techstack"
            } else {
                "generate"
            };
            if self.fail_stage == Some(stage) {
                return Err(LlmError::Api {
                    status: 401,
                    message: "denied".to_string(),
                });
            }
            match stage {
                "translate" => Ok(prompt
                    .split("TEXT:")
                    .nth(1)
                    .unwrap_or(prompt)
                    .trim()
                    .to_string()),
                "techstack" => Ok(
                    r#"{"version": 1, "primary_stack": ["Python", "PostgreSQL"], "role_title": "Data Engineer"}"#
                        .to_string(),
                ),
                _ => Ok(canonical_document()),
            }
        }
    }

    #[test]
    fn test_new_run_is_all_pending_with_zero_progress() {
        let run = PipelineRun::new();
        assert_eq!(run.steps.len(), 4);
        assert!(run.steps.iter().all(|s| s.status == StepStatus::Pending));
        assert_eq!(run.progress_percent(), 0);
    }

    #[test]
    fn test_later_step_cannot_start_before_earlier_completes() {
        let mut run = PipelineRun::new();
        let err = run.start(StepId::Translate).unwrap_err();
        assert_eq!(err, TransitionError::EarlierStepIncomplete(StepId::Translate));

        run.start(StepId::Extract).unwrap();
        // Extract is in_progress, not completed — Translate still blocked
        assert!(run.start(StepId::Translate).is_err());

        run.complete(StepId::Extract).unwrap();
        run.start(StepId::Translate).unwrap();
    }

    #[test]
    fn test_statuses_are_monotonic() {
        let mut run = PipelineRun::new();
        run.start(StepId::Extract).unwrap();
        run.complete(StepId::Extract).unwrap();
        // Completed steps cannot regress or restart
        assert!(run.start(StepId::Extract).is_err());
        assert!(run.fail(StepId::Extract).is_err());
        // Pending steps cannot complete without starting
        assert!(run.complete(StepId::Generate).is_err());
    }

    #[test]
    fn test_progress_counts_completed_steps() {
        let mut run = PipelineRun::new();
        run.start(StepId::Extract).unwrap();
        run.complete(StepId::Extract).unwrap();
        assert_eq!(run.progress_percent(), 25);
        run.start(StepId::Translate).unwrap();
        run.fail(StepId::Translate).unwrap();
        assert_eq!(run.progress_percent(), 25);
    }

    #[tokio::test]
    async fn test_full_run_completes_all_steps() {
        let agent = RoutingAgent::ok();
        let body = "Wanted: data engineer. We use Python and PostgreSQL daily.";
        let outcome = run_pipeline(&agent, text_input(body)).await;

        assert!(outcome.error.is_none());
        assert!(outcome
            .run
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Completed));
        assert_eq!(outcome.run.progress_percent(), 100);

        // Tech stack reflects keywords literally present in the source text
        assert!(outcome.artifacts.tech_stack.contains(&"Python".to_string()));
        assert!(outcome
            .artifacts
            .tech_stack
            .contains(&"PostgreSQL".to_string()));

        // Generated document has all six canonical headers in order
        let doc = outcome.artifacts.challenge_markdown.unwrap();
        let mut last = 0;
        for header in SECTION_HEADERS {
            let pos = doc.find(header).expect("header missing");
            assert!(pos >= last);
            last = pos;
        }

        // Company description was merged into the config
        let config = outcome.artifacts.config.unwrap();
        assert_eq!(
            config.company_description.as_deref(),
            Some("A data platform company.")
        );
    }

    #[tokio::test]
    async fn test_unsupported_file_halts_at_extract() {
        let agent = RoutingAgent::ok();
        let mut input = text_input("body");
        input.content_type = "application/zip".to_string();
        let outcome = run_pipeline(&agent, input).await;

        assert_eq!(outcome.run.steps[0].status, StepStatus::Error);
        assert!(outcome.run.steps[1..]
            .iter()
            .all(|s| s.status == StepStatus::Pending));
        assert_eq!(outcome.error.as_deref(), Some("file-invalid-type"));
        assert!(outcome.artifacts.extracted_text.is_none());
    }

    #[tokio::test]
    async fn test_translate_failure_preserves_extract_artifact() {
        let agent = RoutingAgent::failing_at("translate");
        let outcome = run_pipeline(&agent, text_input("Ein Stellenangebot fuer Ingenieure.")).await;

        assert_eq!(outcome.run.steps[0].status, StepStatus::Completed);
        assert_eq!(outcome.run.steps[1].status, StepStatus::Error);
        assert_eq!(outcome.run.steps[2].status, StepStatus::Pending);
        assert!(outcome.error.is_some());
        // The extracted text survives for diagnosis
        assert!(outcome.artifacts.extracted_text.is_some());
        assert!(outcome.artifacts.translated_text.is_none());
    }

    #[tokio::test]
    async fn test_techstack_agent_failure_does_not_halt_run() {
        let agent = RoutingAgent::failing_at("techstack");
        let outcome = run_pipeline(&agent, text_input("A job offer body.")).await;

        // Tech-stack absorbs its failure; generation still runs
        assert!(outcome.error.is_none());
        assert_eq!(outcome.run.steps[2].status, StepStatus::Completed);
        assert_eq!(outcome.run.steps[3].status, StepStatus::Completed);
        assert!(outcome.artifacts.tech_stack.is_empty());
        assert!(outcome.artifacts.challenge_markdown.is_some());
    }

    #[tokio::test]
    async fn test_generate_failure_preserves_all_earlier_artifacts() {
        let agent = RoutingAgent::failing_at("generate");
        let outcome = run_pipeline(&agent, text_input("A job offer body.")).await;

        assert_eq!(outcome.run.steps[3].status, StepStatus::Error);
        assert!(outcome.error.is_some());
        assert!(outcome.artifacts.extracted_text.is_some());
        assert!(outcome.artifacts.translated_text.is_some());
        assert!(outcome.artifacts.config.is_some());
        assert!(outcome.artifacts.challenge_markdown.is_none());
        assert_eq!(outcome.run.progress_percent(), 75);
    }
}
