mod analysis;
mod config;
mod errors;
mod llm_client;
mod rate_limit;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::{CvAnalyzer, LlmAnalyzer, RuleBasedAnalyzer};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::rate_limit::{InMemoryRateLimiter, RateLimiter, RedisRateLimiter, Unlimited};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so a bad value fails before anything binds
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Lens API v{}", env!("CARGO_PKG_VERSION"));

    let analyzer = build_analyzer(&config);
    let rate_limiter = build_rate_limiter(&config).await;

    let state = AppState {
        config: config.clone(),
        analyzer,
        rate_limiter,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// LLM-enhanced when a key is configured and enabled, rule-based otherwise.
fn build_analyzer(config: &Config) -> Arc<dyn CvAnalyzer> {
    let Some(api_key) = config.llm_api_key() else {
        info!("Analyzer: rule-based");
        return Arc::new(RuleBasedAnalyzer::new(config.max_suggestions));
    };

    match LlmClient::new(api_key.to_string()) {
        Ok(client) => {
            info!(
                "Analyzer: LLM-enhanced (model: {}) with rule-based fallback",
                llm_client::MODEL
            );
            Arc::new(LlmAnalyzer::new(client, config.max_suggestions))
        }
        Err(e) => {
            warn!("LLM client unavailable ({e}), using rule-based analyzer");
            Arc::new(RuleBasedAnalyzer::new(config.max_suggestions))
        }
    }
}

async fn build_rate_limiter(config: &Config) -> Arc<dyn RateLimiter> {
    if config.rate_limit_max_requests == 0 {
        info!("Rate limiting disabled");
        return Arc::new(Unlimited);
    }

    if let Some(url) = &config.redis_url {
        match RedisRateLimiter::connect(
            url,
            config.rate_limit_max_requests,
            config.rate_limit_window,
        )
        .await
        {
            Ok(limiter) => {
                info!("Rate limiter: Redis");
                return Arc::new(limiter);
            }
            Err(e) => warn!("Redis unavailable ({e}), using in-memory rate limiter"),
        }
    }

    info!(
        "Rate limiter: in-memory, {} requests per {}s",
        config.rate_limit_max_requests,
        config.rate_limit_window.as_secs()
    );
    Arc::new(InMemoryRateLimiter::new(
        config.rate_limit_max_requests,
        config.rate_limit_window,
    ))
}
