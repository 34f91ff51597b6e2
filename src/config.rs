//! Configuration loading from environment variables.
//!
//! Values are validated early so startup fails fast with actionable errors.

use crate::error::AppError;
use std::env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: usize = 60;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 1000;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: usize = 30;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Runtime configuration for the translation proxy.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host interface to bind, for example `127.0.0.1`.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
    /// Generative Language API key. Translation requests fail without it.
    pub gemini_api_key: Option<String>,
    /// Model id used for `generateContent` calls.
    pub gemini_model: String,
    /// Base URL of the Generative Language API.
    pub gemini_base_url: String,
    /// Accepted translation requests per caller per minute bucket.
    pub rate_limit_per_minute: usize,
    /// Longest accepted input text, counted in characters.
    pub max_text_chars: usize,
    /// Upper bound on a single provider round trip.
    pub provider_timeout_secs: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Builds configuration from environment variables.
    ///
    /// Variables:
    /// - `HOST` (default `127.0.0.1`)
    /// - `PORT` (default `5000`)
    /// - `GEMINI_API_KEY`, falling back to `GOOGLE_TRANSLATE_API_KEY`
    /// - `GEMINI_MODEL` (default `gemini-pro`)
    /// - `GEMINI_BASE_URL` (default `https://generativelanguage.googleapis.com`)
    /// - `RATE_LIMIT_PER_MINUTE` (default `60`, min `1`, max `10000`)
    /// - `MAX_TEXT_CHARS` (default `1000`, min `1`, max `100000`)
    /// - `PROVIDER_TIMEOUT_SECS` (default `30`, min `1`, max `600`)
    pub fn from_env() -> Result<Self, AppError> {
        let gemini_api_key =
            env_opt("GEMINI_API_KEY").or_else(|| env_opt("GOOGLE_TRANSLATE_API_KEY"));

        Ok(Self {
            host: env_str("HOST", "127.0.0.1"),
            port: env_u16("PORT", DEFAULT_PORT)?,
            gemini_api_key,
            gemini_model: env_str("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: env_str("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            rate_limit_per_minute: env_usize_bounded(
                "RATE_LIMIT_PER_MINUTE",
                DEFAULT_RATE_LIMIT_PER_MINUTE,
                1,
                10_000,
            )?,
            max_text_chars: env_usize_bounded(
                "MAX_TEXT_CHARS",
                DEFAULT_MAX_TEXT_CHARS,
                1,
                100_000,
            )?,
            provider_timeout_secs: env_usize_bounded(
                "PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
                1,
                600,
            )?,
        })
    }

    /// Whether an API key for the remote provider is present.
    pub fn provider_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

fn env_u16(name: &str, default: u16) -> Result<u16, AppError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_port(name, &raw)
}

fn parse_port(name: &str, raw: &str) -> Result<u16, AppError> {
    let parsed = raw.trim().parse::<u16>().map_err(|_| {
        AppError::internal(format!("invalid {name}={raw:?}; expected integer 1-65535"))
    })?;
    if parsed == 0 {
        return Err(AppError::internal(format!(
            "invalid {name}={raw:?}; expected > 0"
        )));
    }
    Ok(parsed)
}

fn env_usize_bounded(
    name: &str,
    default: usize,
    min: usize,
    max: usize,
) -> Result<usize, AppError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_usize_bounded(name, &raw, min, max)
}

fn parse_usize_bounded(name: &str, raw: &str, min: usize, max: usize) -> Result<usize, AppError> {
    let trimmed = raw.trim();
    let parsed = trimmed.parse::<usize>().map_err(|_| {
        AppError::internal(format!(
            "invalid {name}={raw:?}; expected integer in range [{min}, {max}]"
        ))
    })?;
    if parsed < min || parsed > max {
        return Err(AppError::internal(format!(
            "invalid {name}={raw:?}; expected integer in range [{min}, {max}]"
        )));
    }
    Ok(parsed)
}
