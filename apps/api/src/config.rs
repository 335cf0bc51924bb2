use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails fast with the full list of missing required keys.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

const REQUIRED_KEYS: [&str; 7] = [
    "DATABASE_URL",
    "REDIS_URL",
    "S3_BUCKET",
    "S3_ENDPOINT",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "ANTHROPIC_API_KEY",
];

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. All missing required
    /// keys are reported together rather than one at a time.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .filter(|key| lookup(key).map_or(true, |v| v.trim().is_empty()))
            .copied()
            .collect();

        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let get = |key: &str| lookup(key).unwrap_or_default();

        Ok(Config {
            database_url: get("DATABASE_URL"),
            redis_url: get("REDIS_URL"),
            s3_bucket: get("S3_BUCKET"),
            s3_endpoint: get("S3_ENDPOINT"),
            aws_access_key_id: get("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://localhost/forge"),
            ("REDIS_URL", "redis://localhost"),
            ("S3_BUCKET", "forge-uploads"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("AWS_ACCESS_KEY_ID", "minioadmin"),
            ("AWS_SECRET_ACCESS_KEY", "minioadmin"),
            ("ANTHROPIC_API_KEY", "sk-test"),
        ])
    }

    #[test]
    fn test_full_env_loads_with_defaults() {
        let env = full_env();
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.s3_bucket, "forge-uploads");
    }

    #[test]
    fn test_missing_keys_are_enumerated_together() {
        let mut env = full_env();
        env.remove("REDIS_URL");
        env.remove("ANTHROPIC_API_KEY");
        let err = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("REDIS_URL"));
        assert!(msg.contains("ANTHROPIC_API_KEY"));
        assert!(!msg.contains("DATABASE_URL"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut env = full_env();
        env.insert("DATABASE_URL", "   ");
        let err = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut env = full_env();
        env.insert("PORT", "not-a-port");
        let err = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
