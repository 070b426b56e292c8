pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::{handle_analyze, handle_method_not_allowed};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/analyze",
            post(handle_analyze).fallback(handle_method_not_allowed),
        )
        .route(
            "/api/v1/analysis",
            post(handle_analyze).fallback(handle_method_not_allowed),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        extract::ConnectInfo,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::analyzer::{AnalysisOutcome, CvAnalyzer, RuleBasedAnalyzer};
    use crate::analysis::sanitize::ValidatedRequest;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::rate_limit::InMemoryRateLimiter;

    const CV: &str = "Jane Doe\njane@example.com | +44 7700 900123\n\nSummary\n\
        Software Developer with 6 years of JavaScript and React experience.\n\n\
        Experience\n- Built a React dashboard used by 20,000 customers\n\n\
        Skills\nJavaScript, React, Communication\n\nEducation\nBSc Computing, 2018\n";

    fn app_with(analyzer: Arc<dyn CvAnalyzer>, max_requests: u32) -> Router {
        let config = Config::default();
        let state = AppState {
            rate_limiter: Arc::new(InMemoryRateLimiter::new(
                max_requests,
                Duration::from_secs(900),
            )),
            analyzer,
            config,
        };
        build_router(state)
    }

    fn app() -> Router {
        app_with(Arc::new(RuleBasedAnalyzer::new(8)), 10)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_success_envelope() {
        let body = json!({ "cvText": CV, "targetMarket": "uk" });
        let response = app().oneshot(post_json("/api/analyze", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["analysis"]["industry"], "technology");
        assert!(json["analysis"]["overallScore"].is_u64());
        assert!(json["analysis"]["matchScore"].is_null());
        assert_eq!(json["metadata"]["targetMarket"], "uk");
        assert_eq!(json["metadata"]["hasJobDescription"], false);
        assert_eq!(json["metadata"]["analysisType"], "rule_based");
        assert_eq!(json["metadata"]["cvLength"], CV.trim().chars().count());
        assert_eq!(json["metadata"]["jobDescriptionLength"], 0);
    }

    #[tokio::test]
    async fn test_versioned_alias_with_job_description() {
        let body = json!({
            "cvText": CV,
            "jobDescription": "Restaurant steward for our hospitality team",
        });
        let response = app()
            .oneshot(post_json("/api/v1/analysis", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["metadata"]["hasJobDescription"], true);
        assert_eq!(json["analysis"]["jobIndustry"], "hospitality");
        let score = json["analysis"]["matchScore"].as_u64().unwrap();
        assert!(score <= 30);
        assert_eq!(json["analysis"]["overallScore"].as_u64().unwrap(), score);
    }

    #[tokio::test]
    async fn test_short_cv_is_400() {
        let body = json!({ "cvText": "a".repeat(40) });
        let response = app().oneshot(post_json("/api/analyze", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["metadata"]["errorType"], "validation_error");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"cvText\": "))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["metadata"]["errorType"],
            "validation_error"
        );
    }

    #[tokio::test]
    async fn test_get_is_405() {
        let response = app()
            .oneshot(Request::get("/api/analyze").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["metadata"]["errorType"], "method_not_allowed");
    }

    #[tokio::test]
    async fn test_excess_requests_are_429() {
        let app = app_with(Arc::new(RuleBasedAnalyzer::new(8)), 2);
        let body = json!({ "cvText": CV });
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/api/analyze", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(post_json("/api/analyze", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(
            body_json(response).await["metadata"]["errorType"],
            "rate_limit_exceeded"
        );
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_from_one_peer_is_still_limited() {
        let app = app_with(Arc::new(RuleBasedAnalyzer::new(8)), 2);
        let body = json!({ "cvText": CV });
        let peer: SocketAddr = "192.0.2.10:40000".parse().unwrap();

        let mut statuses = Vec::new();
        for i in 0..3 {
            let mut request = Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", format!("10.9.9.{i}, 198.51.100.1"))
                .body(Body::from(body.to_string()))
                .unwrap();
            request.extensions_mut().insert(ConnectInfo(peer));
            let response = app.clone().oneshot(request).await.unwrap();
            statuses.push(response.status());
        }

        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    struct BrokenAnalyzer;

    #[async_trait]
    impl CvAnalyzer for BrokenAnalyzer {
        async fn analyze(&self, _request: &ValidatedRequest) -> Result<AnalysisOutcome, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("keyword table corrupted")))
        }
    }

    #[tokio::test]
    async fn test_internal_error_is_500_without_detail() {
        let app = app_with(Arc::new(BrokenAnalyzer), 10);
        let response = app
            .oneshot(post_json("/api/analyze", &json!({ "cvText": CV })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["metadata"]["errorType"], "internal_error");
        assert!(!json["error"].as_str().unwrap().contains("keyword"));
    }
}
