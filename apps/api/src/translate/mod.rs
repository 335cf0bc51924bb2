// Translation — turns arbitrary-language job-posting text into English via
// the LLM. Large inputs are split into overlapping chunks translated
// sequentially; every call runs under a timeout with bounded retries.

pub mod chunker;
pub mod handlers;
pub mod prompts;
pub mod translator;
