//! Keyword/pattern fallback for tech-stack extraction.
//!
//! Used only when the agent's output cannot be parsed as structured JSON.
//! Three pattern classes are scanned, in order:
//!   1. explicit "tech stack:" / "technologies:" style phrases
//!   2. a known-technology keyword list over the whole text
//!   3. bullet / numbered list items
//! Results are deduplicated case-insensitively, filtered to a plausible
//! length, and capped.

const MIN_ITEM_LEN: usize = 3;
const MAX_ITEM_LEN: usize = 50;
const MAX_ITEMS: usize = 20;

/// Prefixes that announce an inline technology list.
const STACK_PHRASE_PREFIXES: [&str; 5] = [
    "tech stack:",
    "technology stack:",
    "technologies:",
    "stack:",
    "tools:",
];

/// Technologies recognized during free-text and bullet scanning. Matching is
/// case-insensitive on word-ish boundaries; casing below is what gets
/// reported.
const KNOWN_TECHNOLOGIES: [&str; 48] = [
    "Rust",
    "Python",
    "TypeScript",
    "JavaScript",
    "Java",
    "Kotlin",
    "Swift",
    "Golang",
    "Ruby",
    "Elixir",
    "Scala",
    "C++",
    "C#",
    "React",
    "Next.js",
    "Vue",
    "Angular",
    "Svelte",
    "Node.js",
    "Django",
    "Flask",
    "FastAPI",
    "Rails",
    "Spring Boot",
    "Axum",
    "Actix",
    "PostgreSQL",
    "MySQL",
    "SQLite",
    "MongoDB",
    "Redis",
    "Kafka",
    "RabbitMQ",
    "Elasticsearch",
    "GraphQL",
    "gRPC",
    "Docker",
    "Kubernetes",
    "Terraform",
    "AWS",
    "GCP",
    "Azure",
    "Git",
    "CI/CD",
    "Linux",
    "PyTorch",
    "TensorFlow",
    "Spark",
];

/// Best-effort technology extraction from unstructured agent output or raw
/// job-posting text. Never fails; an unusable input yields an empty list.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some(list) = stack_phrase_items(line) {
            found.extend(list);
        }
    }

    found.extend(scan_known_technologies(text));

    for line in text.lines() {
        if let Some(item) = bullet_item(line) {
            found.extend(scan_known_technologies(item));
            // A short bullet is likely a technology name on its own
            if item.len() <= MAX_ITEM_LEN && !item.contains(' ') {
                found.push(item.to_string());
            }
        }
    }

    dedup_and_cap(found)
}

/// Items following an explicit "tech stack:"-style phrase, split on commas,
/// slashes, and " and ".
fn stack_phrase_items(line: &str) -> Option<Vec<String>> {
    let lower = line.to_lowercase();
    let prefix = STACK_PHRASE_PREFIXES
        .iter()
        .find_map(|p| lower.find(p).map(|pos| pos + p.len()))?;
    // Byte offsets can drift on non-ASCII lowercase; skip such lines
    let rest = line.get(prefix..)?;
    Some(
        rest.replace(" and ", ",")
            .split([',', '/', ';'])
            .map(|item| item.trim().trim_end_matches('.').to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    )
}

/// Case-insensitive scan for the known-technology list with rough word
/// boundaries (a hit inside a longer alphanumeric run does not count).
fn scan_known_technologies(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    KNOWN_TECHNOLOGIES
        .iter()
        .filter(|tech| contains_word(&lower, &tech.to_lowercase()))
        .map(|tech| tech.to_string())
        .collect()
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let abs = start + pos;
        let before_ok = abs == 0
            || !haystack[..abs]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after_ok = !haystack[abs + needle.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = abs + needle.len();
    }
    false
}

/// The content of a bullet (`-`, `*`, `•`) or numbered (`1.`, `2)`) line.
fn bullet_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("• "))
    {
        return Some(rest.trim());
    }
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return Some(rest.trim());
        }
    }
    None
}

/// Case-insensitive dedup preserving first casing, plausible-length filter,
/// hard cap. Known technologies bypass the length filter so short names
/// like `C#` survive.
fn dedup_and_cap(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for item in items {
        let len = item.chars().count();
        let known = KNOWN_TECHNOLOGIES
            .iter()
            .any(|tech| tech.eq_ignore_ascii_case(&item));
        if !known && !(MIN_ITEM_LEN..=MAX_ITEM_LEN).contains(&len) {
            continue;
        }
        if seen.insert(item.to_lowercase()) {
            result.push(item);
            if result.len() == MAX_ITEMS {
                break;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_stack_phrase_is_split() {
        let found = extract_keywords("Tech stack: Rust, PostgreSQL and Redis");
        assert!(found.iter().any(|k| k == "Rust"));
        assert!(found.iter().any(|k| k == "PostgreSQL"));
        assert!(found.iter().any(|k| k == "Redis"));
    }

    #[test]
    fn test_known_technologies_found_in_prose() {
        let found = extract_keywords(
            "You will build data pipelines in Python against PostgreSQL and deploy to Kubernetes.",
        );
        assert!(found.contains(&"Python".to_string()));
        assert!(found.contains(&"PostgreSQL".to_string()));
        assert!(found.contains(&"Kubernetes".to_string()));
    }

    #[test]
    fn test_word_boundary_prevents_substring_hits() {
        // "rustic" must not match "Rust"
        let found = extract_keywords("We value rustic craftsmanship in woodworking.");
        assert!(!found.contains(&"Rust".to_string()));
    }

    #[test]
    fn test_bullet_and_numbered_lists_are_scanned() {
        let text = "Requirements:\n- Kafka\n* Docker\n1. Terraform\n2) GraphQL";
        let found = extract_keywords(text);
        for expected in ["Kafka", "Docker", "Terraform", "GraphQL"] {
            assert!(found.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_dedup_is_case_insensitive_and_keeps_first_casing() {
        let found = extract_keywords("Tech stack: Rust, RUST, rust");
        let rust_hits: Vec<_> = found
            .iter()
            .filter(|k| k.eq_ignore_ascii_case("rust"))
            .collect();
        assert_eq!(rust_hits.len(), 1);
        assert_eq!(rust_hits[0], "Rust");
    }

    #[test]
    fn test_length_filter_drops_implausible_items() {
        let long_item = "x".repeat(80);
        let found = extract_keywords(&format!("Tech stack: ab, {long_item}, Rust"));
        assert!(found.iter().all(|k| k != "ab"));
        assert!(found.iter().all(|k| k.len() <= 50));
        assert!(found.contains(&"Rust".to_string()));
    }

    #[test]
    fn test_short_known_technology_survives_length_filter() {
        let found = extract_keywords("Backend services are written in C# on Linux.");
        assert!(found.contains(&"C#".to_string()));
        assert!(found.contains(&"Linux".to_string()));
    }

    #[test]
    fn test_cap_at_twenty_items() {
        let many: Vec<String> = (0..40).map(|i| format!("tool{i:02}")).collect();
        let found = extract_keywords(&format!("Tech stack: {}", many.join(", ")));
        assert_eq!(found.len(), 20);
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("nothing technical here").is_empty());
    }
}
