//! Fit scoring: quality-only mean of section scores, or keyword overlap
//! against a job description with an industry-mismatch penalty.
//!
//! Job-match scores are clamped to [5, 95]; quality scores to [0, 100]. The
//! 5 floor reads as "poor fit" rather than "no effort".

use crate::analysis::industry::Industry;
use crate::analysis::keywords::KeywordMatchSet;

pub const INDUSTRY_MISMATCH_PENALTY: i64 = 45;
pub const EXPERIENCE_SIGNAL_BONUS: i64 = 10;
/// Base score when a job description shares no keywords with the CV.
pub const NO_OVERLAP_BASE: i64 = 20;
pub const JOB_MATCH_FLOOR: u32 = 5;
pub const JOB_MATCH_CEILING: u32 = 95;

/// Rounded arithmetic mean of section scores, in [0, 100].
pub fn quality_score(section_scores: &[u32]) -> u32 {
    if section_scores.is_empty() {
        return 0;
    }
    let sum: u32 = section_scores.iter().sum();
    let mean = (sum as f64 / section_scores.len() as f64).round() as u32;
    mean.min(100)
}

/// True only when both sides classified and the categories differ.
pub fn industries_mismatch(cv: Option<Industry>, job: Option<Industry>) -> bool {
    matches!((cv, job), (Some(a), Some(b)) if a != b)
}

/// Score of a CV against a job description's keyword universe.
///
/// With overlap: `found / required × 100`. Without overlap: a flat base plus a
/// bonus when the CV mentions "year" or "experience". The mismatch penalty
/// applies on both paths before clamping.
pub fn job_match_score(
    cv_text: &str,
    keywords: &KeywordMatchSet,
    cv_industry: Option<Industry>,
    job_industry: Option<Industry>,
) -> u32 {
    let required = keywords.total();
    let matching = keywords.found.len();

    let mut score = if required > 0 && matching > 0 {
        (matching as f64 / required as f64 * 100.0).round() as i64
    } else {
        let lower = cv_text.to_lowercase();
        let bonus = if lower.contains("year") || lower.contains("experience") {
            EXPERIENCE_SIGNAL_BONUS
        } else {
            0
        };
        NO_OVERLAP_BASE + bonus
    };

    if industries_mismatch(cv_industry, job_industry) {
        score -= INDUSTRY_MISMATCH_PENALTY;
    }

    score.clamp(JOB_MATCH_FLOOR as i64, JOB_MATCH_CEILING as i64) as u32
}
