// Tech-Stack Extraction — infers a structured `TechStackConfig` from job
// posting text via the LLM, with a keyword/pattern fallback for runs where
// the agent's output cannot be parsed as JSON.

pub mod config;
pub mod extractor;
pub mod handlers;
pub mod keywords;
pub mod prompts;
