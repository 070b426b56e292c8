use std::sync::Arc;

use crate::analysis::analyzer::CvAnalyzer;
use crate::config::Config;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable analyzer. Default: RuleBasedAnalyzer. LLM-backed when a key is configured.
    pub analyzer: Arc<dyn CvAnalyzer>,
    /// In-memory or Redis-backed, chosen by REDIS_URL.
    pub rate_limiter: Arc<dyn RateLimiter>,
}
