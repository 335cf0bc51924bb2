//! Section Parser — decomposes a challenge document into its six canonical
//! sections and reassembles edited sections back into one Markdown document.
//!
//! `SECTION_HEADERS` is the single source of truth for the document shape.
//! The generation prompt interpolates it and this parser iterates it, so the
//! two can never drift independently.

pub mod handlers;

use serde::{Deserialize, Serialize};

/// The six canonical section headers, order-significant, matched verbatim.
pub const SECTION_HEADERS: [&str; 6] = [
    "## 1. Problem Overview:",
    "## 2. Problem Statement:",
    "## 3. Requirements:",
    "## 4. Optional Requirements:",
    "## 5. Deliverables:",
    "## 6. Evaluation Rubric:",
];

/// One located section: the canonical header and its body text
/// (header line excluded, surrounding whitespace trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub header: String,
    pub body: String,
}

/// The derived decomposition of a challenge document. Ephemeral — recomputed
/// on every load, never persisted on its own. Sections appear in document
/// order; headers missing from the document are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    pub sections: Vec<Section>,
}

impl SectionMap {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.header == header)
            .map(|s| s.body.as_str())
    }

    /// Replaces the body of `header`, or appends the section if the document
    /// did not contain it. Serialization normalizes order either way.
    pub fn set(&mut self, header: &str, body: String) {
        match self.sections.iter_mut().find(|s| s.header == header) {
            Some(section) => section.body = body,
            None => self.sections.push(Section {
                header: header.to_string(),
                body,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Returns true for one of the six canonical headers (exact match).
pub fn is_canonical_header(header: &str) -> bool {
    SECTION_HEADERS.contains(&header)
}

/// Display title for a header: leading `##` and trailing `:` stripped.
/// `## 1. Problem Overview:` → `1. Problem Overview`.
pub fn section_title(header: &str) -> &str {
    header
        .trim_start_matches('#')
        .trim_start()
        .trim_end_matches(':')
}

/// Splits a challenge document into sections by locating the first
/// occurrence of each canonical header (case-sensitive), sorting matches by
/// position, and slicing the text between consecutive matches. The last
/// located section drops a trailing line consisting solely of triple
/// backticks — a generation artifact when the model fences the whole
/// document.
pub fn parse_sections(document: &str) -> SectionMap {
    let mut matches: Vec<(usize, &'static str)> = SECTION_HEADERS
        .iter()
        .filter_map(|header| document.find(header).map(|pos| (pos, *header)))
        .collect();
    matches.sort_by_key(|(pos, _)| *pos);

    let mut sections = Vec::with_capacity(matches.len());
    for (i, (pos, header)) in matches.iter().enumerate() {
        let body_start = pos + header.len();
        let body_end = matches
            .get(i + 1)
            .map(|(next_pos, _)| *next_pos)
            .unwrap_or(document.len());
        let mut body = document[body_start..body_end].trim().to_string();

        if i == matches.len() - 1 {
            body = strip_trailing_fence(&body);
        }

        sections.push(Section {
            header: header.to_string(),
            body,
        });
    }

    SectionMap { sections }
}

/// Reassembles a full document from a section map. Canonical headers are
/// always emitted in canonical order with empty bodies synthesized for
/// absent sections, so the output shape is normalized regardless of the
/// input document's header order.
pub fn serialize_sections(map: &SectionMap) -> String {
    SECTION_HEADERS
        .iter()
        .map(|header| {
            let body = map.get(header).unwrap_or("");
            format!("{header}\n\n{body}\n\n")
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Bodies of the overview and statement sections for the mirrored draft
/// columns. Absent sections mirror as empty strings so the columns always
/// track the document instead of keeping stale text.
pub fn mirror_fields(map: &SectionMap) -> (String, String) {
    (
        map.get(SECTION_HEADERS[0]).unwrap_or_default().to_string(),
        map.get(SECTION_HEADERS[1]).unwrap_or_default().to_string(),
    )
}

/// Drops a final line that is exactly ``` (ignoring surrounding whitespace).
fn strip_trailing_fence(body: &str) -> String {
    let trimmed = body.trim_end();
    match trimmed.rsplit_once('\n') {
        Some((rest, last)) if last.trim() == "```" => rest.trim_end().to_string(),
        None if trimmed.trim() == "```" => String::new(),
        _ => trimmed.to_string(),
    }
}
