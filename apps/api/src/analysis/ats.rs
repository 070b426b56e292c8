//! ATS score: approximate machine-readability, independent of job fit.

use crate::analysis::keywords::KeywordMatchSet;

pub const ATS_FLOOR: u32 = 40;
const LOW_DENSITY_THRESHOLD: f64 = 0.30;
const LOW_DENSITY_PENALTY: u32 = 25;
const NO_EXPERIENCE_PENALTY: u32 = 20;
const NO_SKILLS_PENALTY: u32 = 15;

/// Starts at 100 and never reports below `ATS_FLOOR`.
pub fn ats_score(cv_text: &str, keywords: &KeywordMatchSet) -> u32 {
    let lower = cv_text.to_lowercase();
    let mut score = 100u32;

    if keywords.density() < LOW_DENSITY_THRESHOLD {
        score = score.saturating_sub(LOW_DENSITY_PENALTY);
    }
    if !lower.contains("experience") {
        score = score.saturating_sub(NO_EXPERIENCE_PENALTY);
    }
    if !lower.contains("skills") {
        score = score.saturating_sub(NO_SKILLS_PENALTY);
    }

    score.max(ATS_FLOOR)
}
