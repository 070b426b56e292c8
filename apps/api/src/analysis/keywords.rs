//! Keyword matching against an industry universe or a job description.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::industry::{Industry, INDUSTRY_TABLE, SOFT_SKILLS};

/// Found/missing split of a keyword universe. `found ∪ missing` is the
/// universe, with no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordMatchSet {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl KeywordMatchSet {
    pub fn total(&self) -> usize {
        self.found.len() + self.missing.len()
    }

    /// `found / (found + missing)`, or 0.0 for an empty universe.
    pub fn density(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.found.len() as f64 / total as f64,
        }
    }
}

/// Industry keywords followed by soft skills. With no industry the universe is
/// the soft-skill list alone.
pub fn industry_universe(industry: Option<Industry>) -> Vec<&'static str> {
    let industry_keywords = industry.map(|i| i.keywords()).unwrap_or(&[]);
    dedup(industry_keywords.iter().chain(SOFT_SKILLS.iter()).copied())
}

/// Every table or soft-skill keyword mentioned in the job description, in table order.
pub fn job_description_universe(job_description: &str) -> Vec<&'static str> {
    let lower = job_description.to_lowercase();
    let all = INDUSTRY_TABLE
        .iter()
        .flat_map(|c| c.keywords.iter())
        .chain(SOFT_SKILLS.iter())
        .copied()
        .filter(|k| lower.contains(k));
    dedup(all)
}

/// Case-insensitive substring containment of each universe keyword in `text`.
pub fn match_keywords(text: &str, universe: &[&str]) -> KeywordMatchSet {
    let lower = text.to_lowercase();
    let mut set = KeywordMatchSet::default();
    for keyword in dedup(universe.iter().copied()) {
        if lower.contains(&keyword.to_lowercase()) {
            set.found.push(keyword.to_string());
        } else {
            set.missing.push(keyword.to_string());
        }
    }
    set
}

fn dedup<'a>(keywords: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    keywords.filter(|k| seen.insert(*k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_universe_merges_soft_skills() {
        let universe = industry_universe(Some(Industry::Technology));
        assert_eq!(
            universe.len(),
            Industry::Technology.keywords().len() + SOFT_SKILLS.len()
        );
        assert!(universe.contains(&"react"));
        assert!(universe.contains(&"communication"));
    }

    #[test]
    fn test_universe_without_industry_is_soft_skills() {
        assert_eq!(industry_universe(None), SOFT_SKILLS.to_vec());
    }

    #[test]
    fn test_match_partitions_universe() {
        let universe = industry_universe(Some(Industry::Technology));
        let text = "Senior Software Developer with React, Python and strong communication";
        let set = match_keywords(text, &universe);

        assert!(set.found.contains(&"react".to_string()));
        assert!(set.found.contains(&"python".to_string()));
        assert!(set.missing.contains(&"kubernetes".to_string()));
        assert_eq!(set.total(), universe.len());

        let mut all: Vec<&str> = set
            .found
            .iter()
            .chain(set.missing.iter())
            .map(String::as_str)
            .collect();
        all.sort();
        let mut expected = universe.clone();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_duplicate_universe_entries_are_collapsed() {
        let set = match_keywords("rust", &["rust", "rust", "go"]);
        assert_eq!(set.found, vec!["rust"]);
        assert_eq!(set.missing, vec!["go"]);
    }

    #[test]
    fn test_substring_containment_not_tokenized() {
        let set = match_keywords("JavaScript", &["java"]);
        assert_eq!(set.found, vec!["java"]);
    }

    #[test]
    fn test_job_description_universe_scans_all_tables() {
        let jd = "Hotel steward needed. Must show teamwork and speak to guests. Payroll handled by HR.";
        let universe = job_description_universe(jd);
        assert_eq!(universe, vec!["hotel", "steward", "payroll", "teamwork"]);
    }

    #[test]
    fn test_empty_job_description_yields_empty_universe() {
        assert!(job_description_universe("").is_empty());
        let set = match_keywords("anything", &[]);
        assert_eq!(set.total(), 0);
        assert_eq!(set.density(), 0.0);
    }

    #[test]
    fn test_density() {
        let set = match_keywords("rust and go", &["rust", "go", "java", "c++"]);
        assert!((set.density() - 0.5).abs() < f64::EPSILON);
    }
}
