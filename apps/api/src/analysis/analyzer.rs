//! Analyzer backends behind the HTTP handler.
//!
//! Default: `RuleBasedAnalyzer`, the deterministic engine.
//! Optional: `LlmAnalyzer`, which asks a hosted model for a richer result and
//! falls back to the rule-based engine on any failure. The failure is logged,
//! never returned.
//!
//! `AppState` holds an `Arc<dyn CvAnalyzer>`, chosen at startup via config.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::engine::{analyze, build_weaknesses, AnalysisInput, AnalysisResult};
use crate::analysis::improvements::{generate_improvements, ImprovementSuggestion};
use crate::analysis::issues::IssueKind;
use crate::analysis::match_score::quality_score;
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::sanitize::ValidatedRequest;
use crate::analysis::segmenter::Section;
use crate::errors::AppError;
use crate::llm_client::TextCompletion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    RuleBased,
    AiEnhanced,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub analysis_type: AnalysisType,
}

/// Implement this to add a backend without touching the handler.
#[async_trait]
pub trait CvAnalyzer: Send + Sync {
    async fn analyze(&self, request: &ValidatedRequest) -> Result<AnalysisOutcome, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedAnalyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct RuleBasedAnalyzer {
    pub max_suggestions: usize,
}

impl RuleBasedAnalyzer {
    pub fn new(max_suggestions: usize) -> Self {
        Self { max_suggestions }
    }

    fn run(&self, request: &ValidatedRequest) -> AnalysisResult {
        analyze(&AnalysisInput {
            cv_text: &request.cv_text,
            job_description: request.job_description.as_deref(),
            max_suggestions: self.max_suggestions,
        })
    }
}

#[async_trait]
impl CvAnalyzer for RuleBasedAnalyzer {
    async fn analyze(&self, request: &ValidatedRequest) -> Result<AnalysisOutcome, AppError> {
        let analyzer = *self;
        let request = request.clone();
        // A panic in the engine surfaces as a JoinError and maps to a 500.
        let result = tokio::task::spawn_blocking(move || analyzer.run(&request))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))?;

        debug!(
            overall = result.overall_score,
            ats = result.ats_score,
            "Rule-based analysis complete"
        );
        Ok(AnalysisOutcome {
            result,
            analysis_type: AnalysisType::RuleBased,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAnalyzer
// ────────────────────────────────────────────────────────────────────────────

/// The subset of an `AnalysisResult` a model may supply. Every field is
/// optional; absent fields keep the deterministic value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LlmPayload {
    overall_score: Option<f64>,
    ats_score: Option<f64>,
    sections: HashMap<String, LlmSection>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    suggestions: Option<Vec<String>>,
    improvements: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LlmSection {
    score: Option<f64>,
    issues: Option<Vec<IssueKind>>,
}

impl LlmPayload {
    fn is_empty(&self) -> bool {
        self.overall_score.is_none()
            && self.ats_score.is_none()
            && self.sections.is_empty()
            && self.strengths.is_none()
            && self.weaknesses.is_none()
            && self.suggestions.is_none()
            && self.improvements.is_none()
    }
}

fn to_score(value: f64) -> u32 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

fn section_by_name(name: &str) -> Option<Section> {
    Section::ALL
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
}

pub struct LlmAnalyzer<C> {
    client: C,
    fallback: RuleBasedAnalyzer,
}

impl<C: TextCompletion> LlmAnalyzer<C> {
    pub fn new(client: C, max_suggestions: usize) -> Self {
        Self {
            client,
            fallback: RuleBasedAnalyzer::new(max_suggestions),
        }
    }

    async fn enhanced(&self, request: &ValidatedRequest) -> Result<AnalysisResult, AppError> {
        let prompt = build_analysis_prompt(
            &request.cv_text,
            request.job_description.as_deref(),
            &request.target_market,
        );
        let text = self
            .client
            .complete(ANALYSIS_SYSTEM, &prompt)
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let payload: LlmPayload = serde_json::from_str(&text)
            .map_err(|e| AppError::Upstream(format!("malformed analysis payload: {e}")))?;
        if payload.is_empty() {
            return Err(AppError::Upstream("empty analysis payload".to_string()));
        }

        let base = self.fallback.run(request);
        let has_job_description = request.job_description.is_some();
        Ok(merge(base, payload, has_job_description)
            .normalize(has_job_description, self.fallback.max_suggestions))
    }
}

/// Overlays a model payload on the deterministic result. Without a job
/// description the model's overall score is read as a quality score. When
/// section issues are replaced, weaknesses and improvements the payload does
/// not supply are rebuilt from the merged issues.
fn merge(mut base: AnalysisResult, payload: LlmPayload, has_job_description: bool) -> AnalysisResult {
    let mut sections_changed = false;
    let mut issues_changed = false;
    for (name, section) in payload.sections {
        let Some(kind) = section_by_name(&name) else {
            debug!("Ignoring unknown section '{name}' in model payload");
            continue;
        };
        let target = base.sections.get_mut(kind);
        if let Some(score) = section.score {
            target.score = to_score(score);
            sections_changed = true;
        }
        if let Some(issues) = section.issues {
            target.issues = issues;
            issues_changed = true;
        }
    }
    if sections_changed {
        base.quality_score = quality_score(&base.sections.scores());
    }

    match (payload.overall_score.map(to_score), has_job_description) {
        (Some(score), true) => {
            base.match_score = Some(score);
            base.overall_score = score;
        }
        (Some(score), false) => {
            base.quality_score = score;
            base.overall_score = score;
        }
        (None, true) => {}
        (None, false) => base.overall_score = base.quality_score,
    }

    if let Some(ats) = payload.ats_score {
        base.ats_score = to_score(ats);
    }
    if let Some(strengths) = payload.strengths {
        base.strengths = strengths;
    }
    match payload.weaknesses {
        Some(weaknesses) => base.weaknesses = weaknesses,
        None if issues_changed => base.weaknesses = build_weaknesses(&base.sections),
        None => {}
    }

    let improvements: Option<Vec<ImprovementSuggestion>> = payload
        .improvements
        .map(|raw| {
            raw.into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect::<Vec<_>>()
        })
        .filter(|list| !list.is_empty());
    let improvements = match improvements {
        Some(list) => Some(list),
        None if issues_changed => Some(generate_improvements(
            &base.sections.entries(),
            &base.keyword_match.missing,
            &base.sections.experience.content,
        )),
        None => None,
    };
    if let Some(mut list) = improvements {
        list.sort_by_key(|s| s.priority);
        if payload.suggestions.is_none() {
            base.suggestions = list.iter().map(|s| s.title.clone()).collect();
        }
        base.improvements = list;
    }
    if let Some(suggestions) = payload.suggestions {
        base.suggestions = suggestions;
    }

    base
}

#[async_trait]
impl<C: TextCompletion> CvAnalyzer for LlmAnalyzer<C> {
    async fn analyze(&self, request: &ValidatedRequest) -> Result<AnalysisOutcome, AppError> {
        match self.enhanced(request).await {
            Ok(result) => {
                debug!(overall = result.overall_score, "LLM analysis complete");
                Ok(AnalysisOutcome {
                    result,
                    analysis_type: AnalysisType::AiEnhanced,
                })
            }
            Err(e) => {
                warn!("LLM analysis failed, falling back to rule-based engine: {e}");
                self.fallback.analyze(request).await
            }
        }
    }
}
