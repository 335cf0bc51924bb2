// Challenge Generation — the end-to-end pipeline that turns an uploaded
// job posting into a persisted challenge draft.
//
// Flow: extract text → translate → tech-stack inference → LLM challenge
// generation → best-effort draft auto-save. Step status and intermediate
// artifacts are surfaced to the caller even when a step fails.

pub mod generator;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
