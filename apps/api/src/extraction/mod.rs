// File Text Extraction — cracks an uploaded job posting (PDF or text-like)
// into plain text plus extraction metadata. Validation failures and parser
// failures are reported in the response body; this boundary never throws.

pub mod handlers;
pub mod parse;
