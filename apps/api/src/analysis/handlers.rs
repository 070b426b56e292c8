use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::analysis::analyzer::AnalysisType;
use crate::analysis::engine::AnalysisResult;
use crate::analysis::sanitize::validate_request;
use crate::errors::AppError;
use crate::rate_limit::RateDecision;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeMetadata {
    pub timestamp: String,
    pub target_market: String,
    pub has_job_description: bool,
    pub analysis_type: AnalysisType,
    pub cv_length: usize,
    pub job_description_length: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub metadata: AnalyzeMetadata,
}

/// Rate-limit identity for a request. The socket peer unless `trust_proxy` is
/// set, in which case the right-most `X-Forwarded-For` hop (the one appended by
/// our proxy), then `X-Real-IP`, then the peer.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let peer_ip = || peer.map(|addr| addr.ip().to_string());
    if !trust_proxy {
        return peer_ip().unwrap_or_else(|| "unknown".to_string());
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or(real_ip)
        .map(str::to_string)
        .or_else(peer_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let client = client_key(
        &headers,
        peer.map(|ConnectInfo(addr)| addr),
        state.config.trust_proxy_headers,
    );
    match state.rate_limiter.check(&client).await {
        RateDecision::Limited { retry_after } => {
            info!(client = %client, "Rate limit exceeded");
            return Err(AppError::RateLimited { retry_after });
        }
        RateDecision::Allowed { remaining } => debug!(client = %client, remaining, "Request admitted"),
    }

    let Json(body) =
        body.map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e.body_text())))?;
    let request = validate_request(&body, state.config.input_limits())?;

    let outcome = state.analyzer.analyze(&request).await?;
    debug!(
        client = %client,
        analysis_type = ?outcome.analysis_type,
        overall = outcome.result.overall_score,
        contact_fields = outcome.result.contact.present_count(),
        "Analysis served"
    );

    let metadata = AnalyzeMetadata {
        timestamp: Utc::now().to_rfc3339(),
        target_market: request.target_market.clone(),
        has_job_description: request.job_description.is_some(),
        analysis_type: outcome.analysis_type,
        cv_length: request.cv_text.chars().count(),
        job_description_length: request
            .job_description
            .as_deref()
            .map_or(0, |jd| jd.chars().count()),
    };

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: outcome.result,
        metadata,
    }))
}

/// Fallback for non-POST methods on the analysis routes.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
