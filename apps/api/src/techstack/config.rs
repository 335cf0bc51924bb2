//! The versioned tech-stack config threaded from extraction into challenge
//! generation. Every field except `version` is optional; consumers treat an
//! unparseable config string as the default rather than failing the run.

use serde::{Deserialize, Serialize};

fn default_version() -> u32 {
    1
}

/// Structured description of the role a challenge targets. Produced by the
/// tech-stack extractor, mutated once (company description merged in), then
/// consumed by the challenge generator. Not persisted directly — only its
/// effects (the generated document and the requirements list) are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStackConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub seniority: Option<String>,
    #[serde(default)]
    pub primary_stack: Vec<String>,
    #[serde(default)]
    pub secondary_stack: Vec<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub disallowed_tools: Vec<String>,
    #[serde(default)]
    pub output_language: Option<String>,
    #[serde(default)]
    pub company_description: Option<String>,
}

impl Default for TechStackConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            role_title: None,
            seniority: None,
            primary_stack: Vec::new(),
            secondary_stack: Vec::new(),
            domain: None,
            difficulty: None,
            focus_areas: Vec::new(),
            constraints: Vec::new(),
            allowed_tools: Vec::new(),
            disallowed_tools: Vec::new(),
            output_language: None,
            company_description: None,
        }
    }
}

impl TechStackConfig {
    /// Best-effort parse of a config string. Empty, whitespace, or invalid
    /// JSON yields the default config — a bad config must never fail the
    /// pipeline.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!("Invalid tech-stack config JSON, substituting default: {e}");
            Self::default()
        })
    }

    /// Merges the company description in, keeping an existing one if the
    /// caller passes nothing.
    pub fn with_company_description(mut self, description: Option<&str>) -> Self {
        if let Some(desc) = description {
            if !desc.trim().is_empty() {
                self.company_description = Some(desc.trim().to_string());
            }
        }
        self
    }

    /// Serializes for prompt embedding. Falls back to `{}` — serialization
    /// of this struct cannot realistically fail, but the generator must not
    /// panic on it either.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_yields_default() {
        let config = TechStackConfig::parse_lenient("{invalid");
        assert_eq!(config, TechStackConfig::default());
    }

    #[test]
    fn test_empty_string_yields_default() {
        assert_eq!(TechStackConfig::parse_lenient(""), TechStackConfig::default());
        assert_eq!(
            TechStackConfig::parse_lenient("   \n"),
            TechStackConfig::default()
        );
    }

    #[test]
    fn test_partial_config_parses_with_defaults() {
        let config = TechStackConfig::parse_lenient(
            r#"{"role_title": "Backend Engineer", "primary_stack": ["Rust", "PostgreSQL"]}"#,
        );
        assert_eq!(config.version, 1);
        assert_eq!(config.role_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(config.primary_stack, vec!["Rust", "PostgreSQL"]);
        assert!(config.seniority.is_none());
        assert!(config.constraints.is_empty());
    }

    #[test]
    fn test_company_description_merge() {
        let config = TechStackConfig::default()
            .with_company_description(Some("A fintech scale-up in Berlin."));
        assert_eq!(
            config.company_description.as_deref(),
            Some("A fintech scale-up in Berlin.")
        );
    }

    #[test]
    fn test_blank_company_description_is_ignored() {
        let config = TechStackConfig {
            company_description: Some("existing".to_string()),
            ..Default::default()
        }
        .with_company_description(Some("   "));
        assert_eq!(config.company_description.as_deref(), Some("existing"));
    }

    #[test]
    fn test_version_survives_round_trip() {
        let config = TechStackConfig {
            version: 2,
            ..Default::default()
        };
        let reparsed = TechStackConfig::parse_lenient(&config.to_prompt_json());
        assert_eq!(reparsed.version, 2);
    }
}
