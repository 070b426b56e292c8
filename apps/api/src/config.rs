use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::improvements::DEFAULT_MAX_SUGGESTIONS;
use crate::analysis::sanitize::InputLimits;

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Enables the LLM analyzer when set and `enable_llm_analysis` is true.
    pub anthropic_api_key: Option<String>,
    pub enable_llm_analysis: bool,
    /// Shared rate-limit store. In-process limiting when unset.
    pub redis_url: Option<String>,
    /// Zero disables rate limiting.
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
    /// Key rate limits on `X-Forwarded-For`/`X-Real-IP` instead of the socket
    /// peer. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
    pub max_input_chars: usize,
    pub min_cv_chars: usize,
    pub max_suggestions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            enable_llm_analysis: true,
            redis_url: None,
            rate_limit_max_requests: 10,
            rate_limit_window: Duration::from_secs(15 * 60),
            trust_proxy_headers: false,
            max_input_chars: 15_000,
            min_cv_chars: 50,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            enable_llm_analysis: parse_bool_env("ENABLE_LLM_ANALYSIS", defaults.enable_llm_analysis)?,
            redis_url: optional_env("REDIS_URL"),
            rate_limit_max_requests: parse_env(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            )?,
            rate_limit_window: Duration::from_secs(parse_env(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window.as_secs(),
            )?),
            trust_proxy_headers: parse_bool_env("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers)?,
            max_input_chars: parse_env("MAX_INPUT_CHARS", defaults.max_input_chars)?,
            min_cv_chars: parse_env("MIN_CV_CHARS", defaults.min_cv_chars)?,
            max_suggestions: parse_env("MAX_SUGGESTIONS", defaults.max_suggestions)?,
        })
    }

    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_chars: self.max_input_chars,
            min_cv_chars: self.min_cv_chars,
        }
    }

    /// The API key, if LLM analysis should run.
    pub fn llm_api_key(&self) -> Option<&str> {
        self.anthropic_api_key
            .as_deref()
            .filter(|_| self.enable_llm_analysis)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    match optional_env(key) {
        Some(raw) => parse_bool(key, &raw),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{key} must be a boolean, got '{raw}'"),
    }
}
