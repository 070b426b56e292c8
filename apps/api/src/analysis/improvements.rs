//! Improvement generation: turns scorer issues and missing keywords into a
//! prioritised, deduplicated list of suggestions with before/after rewrites.
//!
//! Suggestions do not point at positions in the CV. A "before" is either the
//! issue's synthetic example or, for experience wording issues, the first long
//! sentence of the experience section; that sentence is not guaranteed to be
//! the one that raised the issue.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::issues::IssueKind;
use crate::analysis::section_scoring::SectionAnalysis;
use crate::analysis::segmenter::Section;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;
const MISSING_KEYWORDS_SHOWN: usize = 5;
const LONG_SENTENCE_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Critical,
    Important,
    NiceToHave,
}

impl Severity {
    fn rank(&self) -> u32 {
        match self {
            Severity::Critical => 0,
            Severity::Important => 1,
            Severity::NiceToHave => 2,
        }
    }
}

/// A single suggestion. `applied` is owned by the UI; the engine always emits `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSuggestion {
    pub id: String,
    pub section: Section,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub before: String,
    pub after: String,
    /// Lower is more urgent.
    pub priority: u32,
    #[serde(default)]
    pub applied: bool,
}

/// Contact and experience issues are critical. Elsewhere the first issue of a
/// section is important and the rest are nice-to-have.
fn severity_for(section: Section, position: usize) -> Severity {
    match section {
        Section::Contact | Section::Experience => Severity::Critical,
        _ if position == 0 => Severity::Important,
        _ => Severity::NiceToHave,
    }
}

/// Builds the full suggestion list sorted by priority. Callers truncate.
pub fn generate_improvements(
    sections: &[(Section, &SectionAnalysis)],
    missing_keywords: &[String],
    experience_text: &str,
) -> Vec<ImprovementSuggestion> {
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    let extracted_before = first_long_sentence(experience_text);

    for (section, analysis) in sections {
        for (position, issue) in analysis.issues.iter().enumerate() {
            let section = issue.section().unwrap_or(*section);
            let id = format!("{}-{}", section.as_str(), issue.slug());
            if !seen.insert(id.clone()) {
                continue;
            }

            let severity = severity_for(section, position);
            let example = issue.example();
            let before = match (issue, &extracted_before) {
                (
                    IssueKind::WeakActionVerbs | IssueKind::NoQuantifiableAchievements,
                    Some(sentence),
                ) => sentence.clone(),
                _ => example.before.to_string(),
            };

            let sequence = suggestions.len() as u32;
            suggestions.push(ImprovementSuggestion {
                id,
                section,
                severity,
                title: issue.title().to_string(),
                description: issue.description().to_string(),
                before,
                after: example.after.to_string(),
                priority: severity.rank() * 100 + sequence,
                applied: false,
            });
        }
    }

    if let Some(keyword_suggestion) = missing_keywords_suggestion(missing_keywords, suggestions.len())
    {
        if seen.insert(keyword_suggestion.id.clone()) {
            suggestions.push(keyword_suggestion);
        }
    }

    suggestions.sort_by_key(|s| s.priority);
    suggestions
}

fn missing_keywords_suggestion(
    missing_keywords: &[String],
    sequence: usize,
) -> Option<ImprovementSuggestion> {
    if missing_keywords.is_empty() {
        return None;
    }
    let shown: Vec<&str> = missing_keywords
        .iter()
        .take(MISSING_KEYWORDS_SHOWN)
        .map(String::as_str)
        .collect();
    let severity = Severity::Important;

    Some(ImprovementSuggestion {
        id: "skills-missing-keywords".to_string(),
        section: Section::Skills,
        severity,
        title: "Add missing keywords".to_string(),
        description: format!(
            "Your CV does not mention {} relevant keyword{}, including: {}.",
            missing_keywords.len(),
            if missing_keywords.len() == 1 { "" } else { "s" },
            shown.join(", ")
        ),
        before: "Skills: Hard-working, Reliable".to_string(),
        after: format!("Skills: Hard-working, Reliable, {}", shown.join(", ")),
        priority: severity.rank() * 100 + sequence as u32,
        applied: false,
    })
}

/// First sentence or line longer than 40 characters, with bullet markers stripped.
fn first_long_sentence(text: &str) -> Option<String> {
    text.split(&['.', '!', '?', '\n'][..])
        .map(|s| {
            s.trim()
                .trim_start_matches(&['-', '•', '*', '–', '▪', '◦', '●', '>'][..])
                .trim()
        })
        .find(|s| s.chars().count() > LONG_SENTENCE_CHARS)
        .map(str::to_string)
}
