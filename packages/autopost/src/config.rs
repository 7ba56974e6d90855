use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::pipeline::{PipelineSettings, PollSettings};
use crate::secret::SecretString;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-opus-4-5-20251101";
pub const DEFAULT_POST_TAGS: &str = "AI시집,n8n";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: SecretString,
    pub wikidocs_api_key: SecretString,
    pub freepik_api_key: SecretString,
    pub anthropic_model: String,
    pub anthropic_base_url: Option<String>,
    pub wikidocs_base_url: Option<String>,
    pub freepik_base_url: Option<String>,
    pub post_tags: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub fail_fast_on_provider_failure: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// All three API keys are required; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<SecretString> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(SecretString::new(value)),
                _ => bail!("{} must be set", name),
            }
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            anthropic_api_key: required("ANTHROPIC_API_KEY")?,
            wikidocs_api_key: required("WIKIDOCS_API_KEY")?,
            freepik_api_key: required("FREEPIK_API_KEY")?,
            anthropic_model: optional("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            anthropic_base_url: optional("ANTHROPIC_BASE_URL"),
            wikidocs_base_url: optional("WIKIDOCS_BASE_URL"),
            freepik_base_url: optional("FREEPIK_BASE_URL"),
            post_tags: optional("POST_TAGS").unwrap_or_else(|| DEFAULT_POST_TAGS.to_string()),
            poll_interval: Duration::from_secs(
                optional("POLL_INTERVAL_SECS")
                    .unwrap_or_else(|| DEFAULT_POLL_INTERVAL_SECS.to_string())
                    .parse()
                    .context("POLL_INTERVAL_SECS must be a whole number of seconds")?,
            ),
            max_poll_attempts: optional("MAX_POLL_ATTEMPTS")
                .unwrap_or_else(|| DEFAULT_MAX_POLL_ATTEMPTS.to_string())
                .parse()
                .context("MAX_POLL_ATTEMPTS must be a valid number")?,
            fail_fast_on_provider_failure: optional("FAIL_FAST_ON_PROVIDER_FAILURE")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .context("FAIL_FAST_ON_PROVIDER_FAILURE must be true or false")?,
        })
    }

    /// Tunables handed to the orchestrator.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            tags: self.post_tags.clone(),
            poll: PollSettings {
                interval: self.poll_interval,
                max_attempts: self.max_poll_attempts,
                fail_fast_on_provider_failure: self.fail_fast_on_provider_failure,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const KEYS: [(&str, &str); 3] = [
        ("ANTHROPIC_API_KEY", "sk-ant"),
        ("WIKIDOCS_API_KEY", "wd"),
        ("FREEPIK_API_KEY", "fp"),
    ];

    #[test]
    fn defaults_apply_when_only_keys_are_set() {
        let config = assert_ok!(Config::from_lookup(lookup_from(&KEYS)));

        assert_eq!(config.anthropic_api_key.expose(), "sk-ant");
        assert_eq!(config.anthropic_model, DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(config.post_tags, "AI시집,n8n");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_poll_attempts, 30);
        assert!(config.fail_fast_on_provider_failure);
        assert!(config.wikidocs_base_url.is_none());
    }

    #[test]
    fn missing_key_fails_fast() {
        let err = assert_err!(Config::from_lookup(lookup_from(&KEYS[..2])));
        assert_eq!(err.to_string(), "FREEPIK_API_KEY must be set");
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let mut vars = KEYS.to_vec();
        vars[1] = ("WIKIDOCS_API_KEY", "  ");
        let err = assert_err!(Config::from_lookup(lookup_from(&vars)));
        assert_eq!(err.to_string(), "WIKIDOCS_API_KEY must be set");
    }

    #[test]
    fn poll_tunables_are_overridable() {
        let mut vars = KEYS.to_vec();
        vars.push(("POLL_INTERVAL_SECS", "5"));
        vars.push(("MAX_POLL_ATTEMPTS", "4"));
        vars.push(("FAIL_FAST_ON_PROVIDER_FAILURE", "false"));

        let settings = assert_ok!(Config::from_lookup(lookup_from(&vars))).pipeline_settings();

        assert_eq!(settings.poll.interval, Duration::from_secs(5));
        assert_eq!(settings.poll.max_attempts, 4);
        assert!(!settings.poll.fail_fast_on_provider_failure);
    }

    #[test]
    fn invalid_number_is_rejected() {
        let mut vars = KEYS.to_vec();
        vars.push(("MAX_POLL_ATTEMPTS", "many"));
        let err = assert_err!(Config::from_lookup(lookup_from(&vars)));
        assert!(err.to_string().contains("MAX_POLL_ATTEMPTS"));
    }

    #[test]
    fn debug_does_not_leak_keys() {
        let config = assert_ok!(Config::from_lookup(lookup_from(&KEYS)));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-ant"));
    }
}
