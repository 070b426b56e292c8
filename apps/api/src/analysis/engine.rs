//! The consolidated analysis pipeline.
//!
//! raw text → segments → (industry ‖ contact) → section scores → keyword match
//! → combined scores → suggestions.
//!
//! `analyze` is a pure, synchronous function of its input: no I/O, no clock, no
//! randomness, no shared mutable state. Identical input yields an identical
//! `AnalysisResult`, and it never fails; degenerate input degrades to low or
//! empty output.

use serde::{Deserialize, Serialize};

use crate::analysis::ats::{ats_score, ATS_FLOOR};
use crate::analysis::contact::{extract_contact, ContactFields};
use crate::analysis::improvements::{generate_improvements, ImprovementSuggestion};
use crate::analysis::industry::{classify, Industry};
use crate::analysis::keywords::{
    industry_universe, job_description_universe, match_keywords, KeywordMatchSet,
};
use crate::analysis::match_score::{
    job_match_score, quality_score, JOB_MATCH_CEILING, JOB_MATCH_FLOOR,
};
use crate::analysis::section_scoring::{
    score_contact, score_education, score_experience, score_skills, score_summary,
    SectionAnalysis,
};
use crate::analysis::segmenter::{segment, Section};

const STRONG_SECTION_SCORE: u32 = 80;
const GOOD_KEYWORD_DENSITY: f64 = 0.6;

/// Engine input. `job_description` that is empty or whitespace counts as absent.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub cv_text: &'a str,
    pub job_description: Option<&'a str>,
    pub max_suggestions: usize,
}

impl<'a> AnalysisInput<'a> {
    pub fn job_description(&self) -> Option<&'a str> {
        self.job_description
            .map(str::trim)
            .filter(|jd| !jd.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionScores {
    pub contact: SectionAnalysis,
    pub summary: SectionAnalysis,
    pub experience: SectionAnalysis,
    pub skills: SectionAnalysis,
    pub education: SectionAnalysis,
}

impl SectionScores {
    pub fn get(&self, section: Section) -> &SectionAnalysis {
        match section {
            Section::Contact => &self.contact,
            Section::Summary => &self.summary,
            Section::Experience => &self.experience,
            Section::Skills => &self.skills,
            Section::Education => &self.education,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut SectionAnalysis {
        match section {
            Section::Contact => &mut self.contact,
            Section::Summary => &mut self.summary,
            Section::Experience => &mut self.experience,
            Section::Skills => &mut self.skills,
            Section::Education => &mut self.education,
        }
    }

    pub fn entries(&self) -> [(Section, &SectionAnalysis); 5] {
        Section::ALL.map(|s| (s, self.get(s)))
    }

    pub fn scores(&self) -> [u32; 5] {
        Section::ALL.map(|s| self.get(s).score)
    }
}

/// Top-level engine output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    /// `match_score` with a job description, `quality_score` otherwise.
    pub overall_score: u32,
    pub ats_score: u32,
    pub quality_score: u32,
    pub match_score: Option<u32>,
    pub industry: Option<Industry>,
    pub job_industry: Option<Industry>,
    pub contact: ContactFields,
    pub sections: SectionScores,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub keyword_match: KeywordMatchSet,
    pub improvements: Vec<ImprovementSuggestion>,
}

pub fn analyze(input: &AnalysisInput<'_>) -> AnalysisResult {
    let cv_text = input.cv_text;
    let job_description = input.job_description();

    let segments = segment(cv_text);
    let contact = extract_contact(cv_text);
    let industry = classify(cv_text);
    let job_industry = job_description.and_then(classify);
    let active_industry = job_industry.or(industry);

    let sections = SectionScores {
        contact: score_contact(&contact, &segments.contact),
        summary: score_summary(&segments.summary),
        experience: score_experience(&segments.experience),
        skills: score_skills(&segments.skills, active_industry),
        education: score_education(&segments.education),
    };

    let universe = match job_description {
        Some(jd) => job_description_universe(jd),
        None => industry_universe(industry),
    };
    let keyword_match = match_keywords(cv_text, &universe);

    let quality = quality_score(&sections.scores());
    let match_score =
        job_description.map(|_| job_match_score(cv_text, &keyword_match, industry, job_industry));
    let ats = ats_score(cv_text, &keyword_match);

    let mut improvements = generate_improvements(
        &sections.entries(),
        &keyword_match.missing,
        &segments.experience,
    );
    improvements.truncate(input.max_suggestions);

    let strengths = build_strengths(&sections, industry, &keyword_match);
    let weaknesses = build_weaknesses(&sections);
    let suggestions = improvements.iter().map(|s| s.title.clone()).collect();

    AnalysisResult {
        overall_score: match_score.unwrap_or(quality),
        ats_score: ats,
        quality_score: quality,
        match_score,
        industry,
        job_industry,
        contact,
        sections,
        strengths,
        weaknesses,
        suggestions,
        keyword_match,
        improvements,
    }
}

fn build_strengths(
    sections: &SectionScores,
    industry: Option<Industry>,
    keywords: &KeywordMatchSet,
) -> Vec<String> {
    let mut strengths: Vec<String> = sections
        .entries()
        .into_iter()
        .filter(|(_, a)| a.score >= STRONG_SECTION_SCORE)
        .map(|(section, _)| strength_phrase(section).to_string())
        .collect();

    if let Some(industry) = industry {
        strengths.push(format!("Clear {} profile", industry.as_str()));
    }
    if keywords.total() > 0 && keywords.density() >= GOOD_KEYWORD_DENSITY {
        strengths.push(format!(
            "Good keyword coverage ({}%)",
            (keywords.density() * 100.0).round() as u32
        ));
    }
    strengths
}

fn strength_phrase(section: Section) -> &'static str {
    match section {
        Section::Contact => "Complete contact details",
        Section::Summary => "Concise, quantified professional summary",
        Section::Experience => "Well-evidenced work experience",
        Section::Skills => "Relevant skills clearly listed",
        Section::Education => "Education clearly presented",
    }
}

pub(crate) fn build_weaknesses(sections: &SectionScores) -> Vec<String> {
    sections
        .entries()
        .into_iter()
        .flat_map(|(_, a)| a.issues.iter().map(|i| i.message().to_string()))
        .collect()
}

impl AnalysisResult {
    /// Clamps every score to its documented bounds and enforces the suggestion
    /// contract. Used on results that did not come from `analyze`.
    pub fn normalize(mut self, has_job_description: bool, max_suggestions: usize) -> Self {
        for section in Section::ALL {
            let analysis = self.sections.get_mut(section);
            analysis.score = analysis.score.min(100);
        }
        self.ats_score = self.ats_score.clamp(ATS_FLOOR, 100);
        self.quality_score = self.quality_score.min(100);

        if has_job_description {
            let score = self.match_score.unwrap_or(self.overall_score);
            let score = score.clamp(JOB_MATCH_FLOOR, JOB_MATCH_CEILING);
            self.match_score = Some(score);
            self.overall_score = score;
        } else {
            self.match_score = None;
            self.overall_score = self.overall_score.min(100);
        }

        self.improvements.sort_by_key(|s| s.priority);
        self.improvements.truncate(max_suggestions);
        for improvement in &mut self.improvements {
            improvement.applied = false;
        }
        self.suggestions.truncate(max_suggestions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::improvements::DEFAULT_MAX_SUGGESTIONS;
    use crate::analysis::issues::IssueKind;
    use crate::analysis::match_score::INDUSTRY_MISMATCH_PENALTY;

    const TECH_CV: &str = "\
Jane Doe
jane.doe@example.com | +44 7700 900123 | linkedin.com/in/janedoe | London

Professional Summary
Software Developer with 6 years of experience building JavaScript and React applications for fintech clients.

Work Experience
Senior Software Developer, Acme Ltd (2019-2024)
- Built a React dashboard used by 20,000 customers, raising retention by 15%
- Reduced response times by 40% through query optimisation
- Mentored 4 junior developers and introduced code review standards

Skills
JavaScript, TypeScript, React, Node.js, SQL, Communication, Leadership

Education
BSc Computer Science, University of Manchester, 2018
";

    const WEAK_CV: &str = "\
Sam Smith
sam@example.com

Summary
Hard worker.

Experience
Worked at a cafe and helped with the customers and the till and assisted the owner with ordering.

Skills
Cooking, cleaning, driving

Education
GCSEs
";

    const HOSPITALITY_JD: &str = "We are hiring a cabin steward for our hospitality team. \
        Restaurant experience and excellent communication required.";

    fn run(cv: &str, jd: Option<&str>) -> AnalysisResult {
        analyze(&AnalysisInput {
            cv_text: cv,
            job_description: jd,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        })
    }

    fn mean(scores: [u32; 5]) -> u32 {
        (scores.iter().sum::<u32>() as f64 / 5.0).round() as u32
    }

    #[test]
    fn test_tech_cv_without_jd_is_technology_and_quality_scored() {
        let r = run(TECH_CV, None);
        assert_eq!(r.industry, Some(Industry::Technology));
        assert_eq!(r.job_industry, None);
        assert_eq!(r.match_score, None);
        assert_eq!(r.quality_score, mean(r.sections.scores()));
        assert_eq!(r.overall_score, r.quality_score);
        assert_eq!(r.sections.scores(), [100, 100, 100, 100, 100], "{:#?}", r.sections);
    }

    #[test]
    fn test_weak_cv_quality_is_mean_of_sections() {
        let r = run(WEAK_CV, None);
        let scores = r.sections.scores();
        // contact: only email; summary short; experience short; skills lack
        // soft skills; education short
        assert_eq!(scores, [40, 60, 50, 80, 75]);
        assert_eq!(r.overall_score, mean(scores));
        assert_eq!(r.overall_score, 61);
    }

    #[test]
    fn test_hospitality_jd_against_tech_cv_applies_mismatch() {
        let r = run(TECH_CV, Some(HOSPITALITY_JD));
        assert_eq!(r.industry, Some(Industry::Technology));
        assert_eq!(r.job_industry, Some(Industry::Hospitality));
        let score = r.match_score.unwrap();
        assert!(score <= 30, "score was {score}");
        assert_eq!(r.overall_score, score);
        assert!(r.keyword_match.missing.contains(&"steward".to_string()));
    }

    #[test]
    fn test_mismatch_penalty_with_identical_overlap() {
        let cv = TECH_CV.replace(
            "Communication, Leadership",
            "Communication, Leadership, Teamwork, Problem Solving, Time Management, \
             Adaptability, Collaboration, Attention to Detail",
        );
        let tech_jd = "Software developer needed for our platform team. You will run Docker \
            and Kubernetes workloads on AWS. We value communication, leadership, teamwork, \
            problem solving, time management, adaptability, collaboration and attention to detail.";
        let hospitality_jd = "Hotel and restaurant staff needed for the cruise season. Software \
            and developer skills are a bonus. We value communication, leadership, teamwork, \
            problem solving, time management, adaptability, collaboration and attention to detail.";

        let tech = run(&cv, Some(tech_jd));
        let hosp = run(&cv, Some(hospitality_jd));

        assert_eq!(tech.industry, Some(Industry::Technology));
        assert_eq!(tech.job_industry, Some(Industry::Technology));
        assert_eq!(hosp.job_industry, Some(Industry::Hospitality));
        assert_eq!(tech.keyword_match.found.len(), hosp.keyword_match.found.len());
        assert_eq!(tech.keyword_match.total(), hosp.keyword_match.total());

        let tech_score = tech.match_score.unwrap();
        let hosp_score = hosp.match_score.unwrap();
        assert_eq!(tech_score - hosp_score, INDUSTRY_MISMATCH_PENALTY as u32);
    }

    #[test]
    fn test_education_year_removal_costs_exactly_15() {
        let with_year = run(TECH_CV, None);
        assert!(!with_year
            .sections
            .education
            .issues
            .contains(&IssueKind::MissingGraduationDates));

        let without = TECH_CV.replace("University of Manchester, 2018", "University of Manchester");
        let without_year = run(&without, None);
        assert!(without_year
            .sections
            .education
            .issues
            .contains(&IssueKind::MissingGraduationDates));
        assert_eq!(
            with_year.sections.education.score - without_year.sections.education.score,
            15
        );
    }

    #[test]
    fn test_five_quantified_bullets_score_full_experience() {
        let cv = "\
Work Experience
- Increased conversion by 12% through A/B testing
- Cut churn by 8% with a loyalty programme
- Grew email open rates by 25% in one quarter
- Reduced support tickets by 30% after a docs overhaul
- Raised NPS by 10% across three regions
";
        let r = run(cv, None);
        assert_eq!(r.sections.experience.score, 100);
        assert!(!r
            .sections
            .experience
            .issues
            .contains(&IssueKind::NoQuantifiableAchievements));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        for (cv, jd) in [(TECH_CV, None), (TECH_CV, Some(HOSPITALITY_JD)), (WEAK_CV, None)] {
            let a = serde_json::to_string(&run(cv, jd)).unwrap();
            let b = serde_json::to_string(&run(cv, jd)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_score_bounds_hold_for_varied_input() {
        let inputs = [
            ("", None),
            ("x", Some("y")),
            (WEAK_CV, Some(HOSPITALITY_JD)),
            (TECH_CV, Some("software developer react javascript communication")),
            (TECH_CV, Some("   ")),
        ];
        for (cv, jd) in inputs {
            let r = run(cv, jd);
            for score in r.sections.scores() {
                assert!(score <= 100);
            }
            assert!((40..=100).contains(&r.ats_score));
            assert!(r.quality_score <= 100);
            if let Some(m) = r.match_score {
                assert!((5..=95).contains(&m));
            }
        }
    }

    #[test]
    fn test_whitespace_job_description_is_quality_mode() {
        let r = run(TECH_CV, Some("   "));
        assert_eq!(r.match_score, None);
        assert_eq!(r.overall_score, r.quality_score);
    }

    #[test]
    fn test_keyword_sets_partition_industry_universe() {
        let r = run(TECH_CV, None);
        let universe = industry_universe(Some(Industry::Technology));
        let mut all: Vec<&str> = r
            .keyword_match
            .found
            .iter()
            .chain(r.keyword_match.missing.iter())
            .map(String::as_str)
            .collect();
        let count = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), count, "duplicates in keyword sets");
        let mut expected = universe;
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_empty_cv_degrades_without_panicking() {
        let r = run("", None);
        assert_eq!(r.industry, None);
        assert_eq!(r.ats_score, 40);
        assert_eq!(r.sections.scores(), [10, 60, 50, 60, 75]);
        assert_eq!(r.quality_score, 51);
        assert_eq!(r.contact, ContactFields::default());
    }

    #[test]
    fn test_suggestions_are_truncated_and_ordered() {
        let r = analyze(&AnalysisInput {
            cv_text: "",
            job_description: None,
            max_suggestions: 3,
        });
        assert_eq!(r.improvements.len(), 3);
        assert_eq!(r.suggestions.len(), 3);
        assert!(r
            .improvements
            .windows(2)
            .all(|w| w[0].priority < w[1].priority));
        assert!(r.improvements.iter().all(|s| !s.applied));
        assert_eq!(r.suggestions[0], r.improvements[0].title);
    }

    #[test]
    fn test_weaknesses_list_every_issue() {
        let r = run(WEAK_CV, None);
        let issue_count: usize = r
            .sections
            .entries()
            .iter()
            .map(|(_, a)| a.issues.len())
            .sum();
        assert_eq!(r.weaknesses.len(), issue_count);
        assert!(r.weaknesses.contains(&"Missing phone number".to_string()));
    }

    #[test]
    fn test_strengths_for_strong_cv() {
        let r = run(TECH_CV, None);
        assert!(r.strengths.contains(&"Complete contact details".to_string()));
        assert!(r.strengths.contains(&"Clear technology profile".to_string()));
    }

    #[test]
    fn test_normalize_clamps_foreign_results() {
        let mut raw = AnalysisResult {
            overall_score: 140,
            ats_score: 3,
            quality_score: 180,
            ..Default::default()
        };
        raw.sections.skills.score = 250;
        let n = raw.clone().normalize(true, 8);
        assert_eq!(n.overall_score, 95);
        assert_eq!(n.match_score, Some(95));
        assert_eq!(n.ats_score, 40);
        assert_eq!(n.quality_score, 100);
        assert_eq!(n.sections.skills.score, 100);

        let n = raw.normalize(false, 8);
        assert_eq!(n.overall_score, 100);
        assert_eq!(n.match_score, None);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(run(TECH_CV, None)).unwrap();
        assert!(json.get("overallScore").is_some());
        assert!(json.get("atsScore").is_some());
        assert!(json.get("keywordMatch").is_some());
        assert_eq!(json["industry"], "technology");
        assert!(json["sections"]["education"]["issues"].is_array());
    }

    #[test]
    fn test_adding_contact_details_never_lowers_contact_score() {
        let body = WEAK_CV.replacen("sam@example.com\n", "", 1);
        let mut header = vec!["Sam Smith".to_string()];
        let mut last = run(&body, None).sections.contact.score;

        for field in [
            "sam@example.com",
            "+44 7700 900123",
            "linkedin.com/in/samsmith",
            "Leeds",
        ] {
            header.push(field.to_string());
            let cv = body.replacen("Sam Smith", &header.join(" | "), 1);
            let r = run(&cv, None);
            assert!(
                r.sections.contact.score >= last,
                "adding {field} lowered contact score to {}",
                r.sections.contact.score
            );
            last = r.sections.contact.score;
        }
        assert_eq!(last, 100);
    }
}
