//! Model-client configuration resolved from flags, then environment, then defaults.

use std::{env, time::Duration};

use crate::{
    error::{PlannerError, Result},
    services::DEFAULT_BASE_URL,
};

pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Settings for the outbound model call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
}

/// Values supplied explicitly, usually from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
}

impl PlannerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }

    /// Resolve from the process environment after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::resolve(ConfigOverrides::default(), |key| env::var(key).ok())
    }

    /// Resolve with explicit overrides taking precedence over the environment.
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Resolution with an injectable environment lookup.
    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let api_key = non_blank(overrides.api_key)
            .or_else(|| non_blank(lookup("OPENAI_API_KEY")))
            .ok_or_else(|| {
                PlannerError::Config(
                    "OPENAI_API_KEY environment variable or --api-key must be set".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = non_blank(overrides.base_url)
            .or_else(|| non_blank(lookup("OPENAI_BASE_URL")))
            .or_else(|| non_blank(lookup("OPENROUTER_BASE_URL")))
        {
            config.base_url = base_url;
        }

        if let Some(model) = non_blank(overrides.model).or_else(|| non_blank(lookup("MODEL"))) {
            config.model = model;
        }

        if let Some(secs) = overrides.timeout_secs {
            if secs == 0 {
                return Err(PlannerError::Config(
                    "timeout must be at least one second".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if overrides.max_tokens.is_some() {
            config.max_tokens = overrides.max_tokens;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = PlannerConfig::resolve(ConfigOverrides::default(), env_of(&[])).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn environment_fills_defaults() {
        let config = PlannerConfig::resolve(
            ConfigOverrides::default(),
            env_of(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENROUTER_BASE_URL", "http://router.local/v1"),
                ("MODEL", "google/gemini-2.0-flash"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.base_url, "http://router.local/v1");
        assert_eq!(config.model, "google/gemini-2.0-flash");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn flags_win_over_environment() {
        let overrides = ConfigOverrides {
            api_key: Some("sk-flag".into()),
            base_url: Some("http://flag.local".into()),
            timeout_secs: Some(30),
            ..ConfigOverrides::default()
        };
        let config = PlannerConfig::resolve(
            overrides,
            env_of(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENAI_BASE_URL", "http://env.local"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_key, "sk-flag");
        assert_eq!(config.base_url, "http://flag.local");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn openai_base_url_is_preferred() {
        let config = PlannerConfig::resolve(
            ConfigOverrides::default(),
            env_of(&[
                ("OPENAI_API_KEY", "k"),
                ("OPENAI_BASE_URL", "http://openai.local"),
                ("OPENROUTER_BASE_URL", "http://router.local"),
            ]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://openai.local");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let overrides = ConfigOverrides {
            api_key: Some("k".into()),
            timeout_secs: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(PlannerConfig::resolve(overrides, env_of(&[])).is_err());
    }
}
