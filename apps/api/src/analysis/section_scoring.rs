//! Section scorers: each starts at 100, subtracts fixed penalties per issue
//! and floors at 0.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::contact::ContactFields;
use crate::analysis::industry::{count_keywords, Industry};
use crate::analysis::issues::IssueKind;

static QUANTIFIABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*%|\d+\s*years?\b|\d+\+|[$£€]\s?\d[\d,]*(?:\.\d+)?\s*[kmb]?").unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

const WEAK_VERBS: &[&str] = &["worked", "helped", "assisted", "was responsible"];

const BULLET_MARKERS: &[char] = &['-', '•', '*', '–', '▪', '◦', '●', '>'];

const SUMMARY_MIN_CHARS: usize = 50;
const SUMMARY_MAX_CHARS: usize = 300;
const EXPERIENCE_MIN_CHARS: usize = 100;
const EXPERIENCE_MIN_BULLETS: usize = 3;
const SKILLS_MIN_CHARS: usize = 20;
const SKILLS_MIN_INDUSTRY_HITS: usize = 2;
const EDUCATION_MIN_CHARS: usize = 20;

/// Score and issues for one section of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionAnalysis {
    pub score: u32,
    pub issues: Vec<IssueKind>,
    pub content: String,
}

impl SectionAnalysis {
    fn from_issues(content: &str, issues: Vec<IssueKind>) -> Self {
        let deducted: u32 = issues.iter().map(IssueKind::penalty).sum();
        SectionAnalysis {
            score: 100u32.saturating_sub(deducted),
            issues,
            content: content.to_string(),
        }
    }
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

pub fn score_contact(contact: &ContactFields, content: &str) -> SectionAnalysis {
    let mut issues = Vec::new();
    if contact.email.is_empty() {
        issues.push(IssueKind::MissingEmail);
    }
    if contact.phone.is_empty() {
        issues.push(IssueKind::MissingPhone);
    }
    if contact.linkedin.is_empty() {
        issues.push(IssueKind::MissingLinkedin);
    }
    if contact.location.is_empty() {
        issues.push(IssueKind::MissingLocation);
    }
    SectionAnalysis::from_issues(content, issues)
}

pub fn score_summary(content: &str) -> SectionAnalysis {
    let len = char_len(content);
    let mut issues = Vec::new();
    if len < SUMMARY_MIN_CHARS {
        issues.push(IssueKind::SummaryMissing);
    } else {
        if !content.chars().any(|c| c.is_ascii_digit()) {
            issues.push(IssueKind::SummaryNotQuantified);
        }
        if len > SUMMARY_MAX_CHARS {
            issues.push(IssueKind::SummaryTooLong);
        }
    }
    SectionAnalysis::from_issues(content, issues)
}

pub fn score_experience(content: &str) -> SectionAnalysis {
    let mut issues = Vec::new();
    if char_len(content) < EXPERIENCE_MIN_CHARS {
        issues.push(IssueKind::ExperienceMissing);
    } else {
        if count_bullets(content) < EXPERIENCE_MIN_BULLETS {
            issues.push(IssueKind::FewBulletPoints);
        }
        if !has_quantifiable(content) {
            issues.push(IssueKind::NoQuantifiableAchievements);
        }
        if has_weak_verbs(content) {
            issues.push(IssueKind::WeakActionVerbs);
        }
    }
    SectionAnalysis::from_issues(content, issues)
}

/// `industry` is the active industry filter; when `None` the industry-skill
/// check is skipped.
pub fn score_skills(content: &str, industry: Option<Industry>) -> SectionAnalysis {
    let mut issues = Vec::new();
    if char_len(content) < SKILLS_MIN_CHARS {
        issues.push(IssueKind::SkillsMissing);
    } else {
        let lower = content.to_lowercase();
        if let Some(industry) = industry {
            if count_keywords(&lower, industry.keywords()) < SKILLS_MIN_INDUSTRY_HITS {
                issues.push(IssueKind::FewIndustrySkills);
            }
        }
        if !lower.contains("communication") && !lower.contains("leadership") {
            issues.push(IssueKind::NoSoftSkills);
        }
    }
    SectionAnalysis::from_issues(content, issues)
}

pub fn score_education(content: &str) -> SectionAnalysis {
    let mut issues = Vec::new();
    if char_len(content) < EDUCATION_MIN_CHARS {
        issues.push(IssueKind::EducationMissing);
    } else if !YEAR_RE.is_match(content) {
        issues.push(IssueKind::MissingGraduationDates);
    }
    SectionAnalysis::from_issues(content, issues)
}

fn count_bullets(content: &str) -> usize {
    content
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with(BULLET_MARKERS))
        .count()
}

fn has_quantifiable(text: &str) -> bool {
    QUANTIFIABLE_RE.is_match(text)
}

fn has_weak_verbs(text: &str) -> bool {
    let lower = text.to_lowercase();
    WEAK_VERBS.iter().any(|v| lower.contains(v))
}
