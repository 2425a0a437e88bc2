//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables (optionally seeded
//! from a `.env` file) so the same binary runs unchanged across environments.

use std::env;
use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Default upstream chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default upstream request deadline in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Default cap on a request body in bytes
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Persona used when neither `PERSONA` nor `CONTEXT` is set
pub const DEFAULT_PERSONA: &str = "You are a virtual assistant focused on education. \
You share information about schools and help people who want to donate to schools \
file the matching income tax declaration.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct Config {
    /// Upstream completion provider credential
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,

    /// Deadline for a single upstream call; `None` waits indefinitely
    pub upstream_timeout: Option<Duration>,

    /// Persona text prepended to every upstream request
    pub persona: String,

    /// Per-user history cap; `None` keeps every message
    pub history_max_messages: Option<usize>,

    /// Largest request body accepted before answering 413
    pub max_body_bytes: usize,

    /// Runtime configuration
    pub port: u16,
    pub cors_enabled: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("persona", &self.persona)
            .field("history_max_messages", &self.history_max_messages)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("port", &self.port)
            .field("cors_enabled", &self.cors_enabled)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let persona = var("PERSONA")
            .or_else(|| var("CONTEXT"))
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("UPSTREAM_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let history_max_messages = match var("HISTORY_MAX_MESSAGES") {
            Some(raw) => {
                let max = parse_number::<usize>("HISTORY_MAX_MESSAGES", &raw)?;
                if max == 0 {
                    return Err(ConfigError::Invalid {
                        name: "HISTORY_MAX_MESSAGES",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Some(max)
            }
            None => None,
        };

        let max_body_bytes = match var("MAX_BODY_BYTES") {
            Some(raw) => {
                let max = parse_number::<usize>("MAX_BODY_BYTES", &raw)?;
                if max == 0 {
                    return Err(ConfigError::Invalid {
                        name: "MAX_BODY_BYTES",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                max
            }
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let port = match var("PORT") {
            Some(raw) => parse_number::<u16>("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let cors_enabled = match var("CORS_ENABLED") {
            Some(raw) => parse_bool("CORS_ENABLED", &raw)?,
            None => true,
        };

        Ok(Self {
            openai_api_key,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            upstream_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            persona,
            history_max_messages,
            max_body_bytes,
            port,
            cors_enabled,
        })
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
