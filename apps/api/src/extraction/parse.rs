//! MIME/size validation and text extraction from uploaded file bytes.

use serde::Serialize;
use thiserror::Error;

/// Upload cap. Rejections use the `file-too-large` code.
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// MIME types the extractor accepts. Everything else is `file-invalid-type`.
pub const ACCEPTED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "text/plain",
    "text/markdown",
    "text/csv",
];

/// Machine-readable rejection codes surfaced to the client before any
/// parsing work happens.
pub const ERR_FILE_TOO_LARGE: &str = "file-too-large";
pub const ERR_FILE_INVALID_TYPE: &str = "file-invalid-type";
pub const ERR_FILE_MISSING: &str = "file-missing";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("file-too-large")]
    TooLarge,
    #[error("file-invalid-type")]
    InvalidType,
    #[error("extraction failed: {0}")]
    Parse(String),
}

impl ExtractionError {
    /// The stable error code clients branch on.
    pub fn code(&self) -> &str {
        match self {
            ExtractionError::TooLarge => ERR_FILE_TOO_LARGE,
            ExtractionError::InvalidType => ERR_FILE_INVALID_TYPE,
            ExtractionError::Parse(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionMetadata {
    pub word_count: usize,
    pub char_count: usize,
    pub line_count: usize,
    /// Present for PDFs when page breaks survive extraction.
    pub page_count: Option<usize>,
    /// How the text was obtained: "pdf" or "utf-8".
    pub extraction_method: &'static str,
    /// S3 key of the archived original, when archiving succeeded.
    pub storage_key: Option<String>,
}

/// Validates size and MIME type ahead of any parsing. The MIME comparison
/// ignores parameters (`text/plain; charset=utf-8` passes).
pub fn validate_upload(content_type: &str, size: usize) -> Result<(), ExtractionError> {
    if size > MAX_FILE_SIZE_BYTES {
        return Err(ExtractionError::TooLarge);
    }
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&essence.as_str()) {
        return Err(ExtractionError::InvalidType);
    }
    Ok(())
}

/// Extracts plain text from validated file bytes.
pub fn extract_text(
    content_type: &str,
    bytes: &[u8],
) -> Result<(String, ExtractionMetadata), ExtractionError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let (text, method, page_count) = if essence == "application/pdf" {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Parse(format!("PDF extraction failed: {e}")))?;
        let pages = page_count_from_form_feeds(&text);
        (text, "pdf", pages)
    } else {
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| ExtractionError::Parse("File is not valid UTF-8 text".to_string()))?;
        (text, "utf-8", None)
    };

    let normalized = text.replace('\u{000C}', "\n").trim().to_string();
    if normalized.is_empty() {
        return Err(ExtractionError::Parse(
            "No text could be extracted from the file".to_string(),
        ));
    }

    let metadata = ExtractionMetadata {
        word_count: normalized.split_whitespace().count(),
        char_count: normalized.chars().count(),
        line_count: normalized.lines().count(),
        page_count,
        extraction_method: method,
        storage_key: None,
    };

    Ok((normalized, metadata))
}

/// pdf-extract separates pages with form feeds; when any are present, the
/// page count is feeds + 1.
fn page_count_from_form_feeds(text: &str) -> Option<usize> {
    let feeds = text.matches('\u{000C}').count();
    (feeds > 0).then_some(feeds + 1)
}
