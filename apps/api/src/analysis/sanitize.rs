//! Request validation and sanitisation in front of the analysis engine.
//!
//! The body is inspected as raw JSON so a non-string `cvText` is reported as a
//! validation error instead of a deserialisation failure.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::AppError;

pub const DEFAULT_TARGET_MARKET: &str = "global";

static SCRIPT_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static UNCLOSED_SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?script\b[^>]*>").unwrap());
static JAVASCRIPT_URI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript\s*:").unwrap());

/// Length limits applied to incoming text.
#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_chars: usize,
    pub min_cv_chars: usize,
}

/// A request that passed validation. Text fields are already sanitised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub cv_text: String,
    /// `None` when absent, null, or blank after sanitisation.
    pub job_description: Option<String>,
    pub target_market: String,
}

/// Removes script blocks and `javascript:` URIs, then truncates to `max_chars`
/// characters.
pub fn sanitize_text(text: &str, max_chars: usize) -> String {
    let without_blocks = SCRIPT_TAG_RE.replace_all(text, "");
    let without_tags = UNCLOSED_SCRIPT_RE.replace_all(&without_blocks, "");
    let cleaned = JAVASCRIPT_URI_RE.replace_all(&without_tags, "");
    truncate_chars(cleaned.trim(), max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

pub fn validate_request(body: &Value, limits: InputLimits) -> Result<ValidatedRequest, AppError> {
    let cv_raw = match body.get("cvText") {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => {
            return Err(AppError::Validation("cvText is required".to_string()))
        }
        Some(_) => return Err(AppError::Validation("cvText must be a string".to_string())),
    };

    let cv_text = sanitize_text(cv_raw, limits.max_chars);
    if cv_text.chars().count() < limits.min_cv_chars {
        return Err(AppError::Validation(format!(
            "cvText must be at least {} characters",
            limits.min_cv_chars
        )));
    }

    let job_description = match body.get("jobDescription") {
        Some(Value::String(s)) => {
            Some(sanitize_text(s, limits.max_chars)).filter(|jd| !jd.is_empty())
        }
        Some(Value::Null) | None => None,
        Some(_) => {
            return Err(AppError::Validation(
                "jobDescription must be a string".to_string(),
            ))
        }
    };

    let target_market = body
        .get("targetMarket")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_TARGET_MARKET)
        .to_string();

    Ok(ValidatedRequest {
        cv_text,
        job_description,
        target_market,
    })
}
