//! Issue kinds raised by the section scorers.
//!
//! Each kind carries its own penalty, message and before/after example, so the
//! improvement generator dispatches on the variant instead of matching issue
//! text. On the wire an issue is its message string; unknown strings (e.g. from
//! an LLM payload) round-trip through `IssueKind::Custom`.

use serde::{Deserialize, Serialize};

use crate::analysis::segmenter::Section;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueKind {
    MissingEmail,
    MissingPhone,
    MissingLinkedin,
    MissingLocation,
    SummaryMissing,
    SummaryNotQuantified,
    SummaryTooLong,
    ExperienceMissing,
    FewBulletPoints,
    NoQuantifiableAchievements,
    WeakActionVerbs,
    SkillsMissing,
    FewIndustrySkills,
    NoSoftSkills,
    EducationMissing,
    MissingGraduationDates,
    Custom(String),
}

/// Synthetic before/after rewrite attached to an improvement suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePair {
    pub before: &'static str,
    pub after: &'static str,
}

const GENERIC_EXAMPLE: ExamplePair = ExamplePair {
    before: "Responsible for various tasks and duties.",
    after: "Delivered 3 process improvements that cut turnaround time by 20%.",
};

impl IssueKind {
    pub fn known() -> [IssueKind; 16] {
        [
            IssueKind::MissingEmail,
            IssueKind::MissingPhone,
            IssueKind::MissingLinkedin,
            IssueKind::MissingLocation,
            IssueKind::SummaryMissing,
            IssueKind::SummaryNotQuantified,
            IssueKind::SummaryTooLong,
            IssueKind::ExperienceMissing,
            IssueKind::FewBulletPoints,
            IssueKind::NoQuantifiableAchievements,
            IssueKind::WeakActionVerbs,
            IssueKind::SkillsMissing,
            IssueKind::FewIndustrySkills,
            IssueKind::NoSoftSkills,
            IssueKind::EducationMissing,
            IssueKind::MissingGraduationDates,
        ]
    }

    /// Points deducted from the section score.
    pub fn penalty(&self) -> u32 {
        match self {
            IssueKind::MissingEmail => 30,
            IssueKind::MissingPhone => 25,
            IssueKind::MissingLinkedin => 20,
            IssueKind::MissingLocation => 15,
            IssueKind::SummaryMissing => 40,
            IssueKind::SummaryNotQuantified => 20,
            IssueKind::SummaryTooLong => 15,
            IssueKind::ExperienceMissing => 50,
            IssueKind::FewBulletPoints => 25,
            IssueKind::NoQuantifiableAchievements => 30,
            IssueKind::WeakActionVerbs => 20,
            IssueKind::SkillsMissing => 40,
            IssueKind::FewIndustrySkills => 25,
            IssueKind::NoSoftSkills => 20,
            IssueKind::EducationMissing => 25,
            IssueKind::MissingGraduationDates => 15,
            IssueKind::Custom(_) => 0,
        }
    }

    pub fn section(&self) -> Option<Section> {
        match self {
            IssueKind::MissingEmail
            | IssueKind::MissingPhone
            | IssueKind::MissingLinkedin
            | IssueKind::MissingLocation => Some(Section::Contact),
            IssueKind::SummaryMissing
            | IssueKind::SummaryNotQuantified
            | IssueKind::SummaryTooLong => Some(Section::Summary),
            IssueKind::ExperienceMissing
            | IssueKind::FewBulletPoints
            | IssueKind::NoQuantifiableAchievements
            | IssueKind::WeakActionVerbs => Some(Section::Experience),
            IssueKind::SkillsMissing | IssueKind::FewIndustrySkills | IssueKind::NoSoftSkills => {
                Some(Section::Skills)
            }
            IssueKind::EducationMissing | IssueKind::MissingGraduationDates => {
                Some(Section::Education)
            }
            IssueKind::Custom(_) => None,
        }
    }

    /// Human-readable issue text, as reported in `SectionAnalysis::issues`.
    pub fn message(&self) -> &str {
        match self {
            IssueKind::MissingEmail => "Missing email address",
            IssueKind::MissingPhone => "Missing phone number",
            IssueKind::MissingLinkedin => "Missing LinkedIn profile",
            IssueKind::MissingLocation => "Missing location",
            IssueKind::SummaryMissing => "Professional summary is missing or too short",
            IssueKind::SummaryNotQuantified => "Summary lacks quantifiable achievements",
            IssueKind::SummaryTooLong => "Summary is too long",
            IssueKind::ExperienceMissing => "Work experience section is missing or too brief",
            IssueKind::FewBulletPoints => "Too few bullet points in experience",
            IssueKind::NoQuantifiableAchievements => "No quantifiable achievements in experience",
            IssueKind::WeakActionVerbs => "Weak or passive action verbs",
            IssueKind::SkillsMissing => "Skills section is missing or too brief",
            IssueKind::FewIndustrySkills => "Few industry-specific skills listed",
            IssueKind::NoSoftSkills => "No soft skills such as communication or leadership",
            IssueKind::EducationMissing => "Education section is missing or too brief",
            IssueKind::MissingGraduationDates => "Missing graduation dates",
            IssueKind::Custom(text) => text,
        }
    }

    /// Stable identifier fragment used in suggestion ids.
    pub fn slug(&self) -> String {
        match self {
            IssueKind::MissingEmail => "missing-email".to_string(),
            IssueKind::MissingPhone => "missing-phone".to_string(),
            IssueKind::MissingLinkedin => "missing-linkedin".to_string(),
            IssueKind::MissingLocation => "missing-location".to_string(),
            IssueKind::SummaryMissing => "summary-missing".to_string(),
            IssueKind::SummaryNotQuantified => "summary-not-quantified".to_string(),
            IssueKind::SummaryTooLong => "summary-too-long".to_string(),
            IssueKind::ExperienceMissing => "experience-missing".to_string(),
            IssueKind::FewBulletPoints => "few-bullet-points".to_string(),
            IssueKind::NoQuantifiableAchievements => "no-quantifiable-achievements".to_string(),
            IssueKind::WeakActionVerbs => "weak-action-verbs".to_string(),
            IssueKind::SkillsMissing => "skills-missing".to_string(),
            IssueKind::FewIndustrySkills => "few-industry-skills".to_string(),
            IssueKind::NoSoftSkills => "no-soft-skills".to_string(),
            IssueKind::EducationMissing => "education-missing".to_string(),
            IssueKind::MissingGraduationDates => "missing-graduation-dates".to_string(),
            IssueKind::Custom(text) => {
                let slug: String = text
                    .to_lowercase()
                    .chars()
                    .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
                    .collect();
                slug.split('-')
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
                    .join("-")
            }
        }
    }

    /// Short imperative title for the improvement suggestion.
    pub fn title(&self) -> &str {
        match self {
            IssueKind::MissingEmail => "Add a professional email address",
            IssueKind::MissingPhone => "Add a phone number",
            IssueKind::MissingLinkedin => "Add your LinkedIn profile",
            IssueKind::MissingLocation => "Add your location",
            IssueKind::SummaryMissing => "Write a professional summary",
            IssueKind::SummaryNotQuantified => "Quantify your summary",
            IssueKind::SummaryTooLong => "Shorten your summary",
            IssueKind::ExperienceMissing => "Expand your work experience",
            IssueKind::FewBulletPoints => "Use bullet points for achievements",
            IssueKind::NoQuantifiableAchievements => "Add measurable results",
            IssueKind::WeakActionVerbs => "Use strong action verbs",
            IssueKind::SkillsMissing => "Add a skills section",
            IssueKind::FewIndustrySkills => "List more industry skills",
            IssueKind::NoSoftSkills => "Mention key soft skills",
            IssueKind::EducationMissing => "Add your education",
            IssueKind::MissingGraduationDates => "Add graduation dates",
            IssueKind::Custom(text) => text,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            IssueKind::MissingEmail => {
                "Recruiters need a direct way to reach you. Put your email in the header."
            }
            IssueKind::MissingPhone => "Include a phone number so recruiters can call you.",
            IssueKind::MissingLinkedin => {
                "A LinkedIn URL lets recruiters verify your history and network."
            }
            IssueKind::MissingLocation => {
                "State your city so employers can judge commute and right to work."
            }
            IssueKind::SummaryMissing => {
                "Open with 2-3 sentences covering your role, experience and main strength."
            }
            IssueKind::SummaryNotQuantified => {
                "Numbers in the summary make your impact concrete at a glance."
            }
            IssueKind::SummaryTooLong => "Keep the summary under 300 characters.",
            IssueKind::ExperienceMissing => {
                "Describe each role with responsibilities and achievements."
            }
            IssueKind::FewBulletPoints => {
                "List at least 3 bullet points per role, one achievement each."
            }
            IssueKind::NoQuantifiableAchievements => {
                "Add percentages, amounts, counts or durations to show results."
            }
            IssueKind::WeakActionVerbs => {
                "Replace passive phrasing with verbs like led, built, delivered or increased."
            }
            IssueKind::SkillsMissing => {
                "A dedicated skills list helps both recruiters and ATS filters."
            }
            IssueKind::FewIndustrySkills => {
                "Name the core tools and techniques employers in your field search for."
            }
            IssueKind::NoSoftSkills => {
                "Communication and leadership are among the most searched soft skills."
            }
            IssueKind::EducationMissing => "Include your highest qualification and institution.",
            IssueKind::MissingGraduationDates => {
                "Add the year you graduated or expect to graduate."
            }
            IssueKind::Custom(_) => "Review this part of your CV.",
        }
    }

    pub fn example(&self) -> ExamplePair {
        match self {
            IssueKind::MissingEmail => ExamplePair {
                before: "John Smith | London",
                after: "John Smith | john.smith@email.com | London",
            },
            IssueKind::MissingPhone => ExamplePair {
                before: "john.smith@email.com",
                after: "john.smith@email.com | +44 7700 900123",
            },
            IssueKind::MissingLinkedin => ExamplePair {
                before: "john.smith@email.com | +44 7700 900123",
                after: "john.smith@email.com | +44 7700 900123 | linkedin.com/in/johnsmith",
            },
            IssueKind::MissingLocation => ExamplePair {
                before: "john.smith@email.com | +44 7700 900123",
                after: "john.smith@email.com | +44 7700 900123 | Manchester, UK",
            },
            IssueKind::SummaryMissing => ExamplePair {
                before: "Hard-working professional.",
                after: "Customer-focused professional with 5 years of experience leading teams \
                        of up to 12 and improving satisfaction scores by 18%.",
            },
            IssueKind::SummaryNotQuantified => ExamplePair {
                before: "Experienced manager who improves team performance.",
                after: "Manager with 7 years of experience who raised team output by 25%.",
            },
            IssueKind::SummaryTooLong => ExamplePair {
                before: "I am a highly motivated individual who has worked in many roles over \
                         many years and has gained a wide range of skills in many areas...",
                after: "Operations lead with 8 years in logistics, cutting delivery costs by 15%.",
            },
            IssueKind::ExperienceMissing => ExamplePair {
                before: "Sales Assistant, ABC Retail",
                after: "Sales Assistant, ABC Retail (2019-2022)\n- Served 80+ customers daily\n\
                        - Exceeded monthly sales target by 12%",
            },
            IssueKind::FewBulletPoints => ExamplePair {
                before: "Managed the store and trained staff and handled stock.",
                after: "- Managed a store with £1.2M annual turnover\n- Trained 6 new staff\n\
                        - Cut stock discrepancies by 30%",
            },
            IssueKind::NoQuantifiableAchievements => ExamplePair {
                before: "Improved customer satisfaction.",
                after: "Improved customer satisfaction scores by 25% within 6 months.",
            },
            IssueKind::WeakActionVerbs => ExamplePair {
                before: "Was responsible for managing the team.",
                after: "Led a team of 8, delivering all projects on schedule.",
            },
            IssueKind::SkillsMissing => ExamplePair {
                before: "(no skills section)",
                after: "Skills: Project Management, Data Analysis, Communication, Leadership",
            },
            IssueKind::FewIndustrySkills => ExamplePair {
                before: "Skills: Hard-working, Punctual",
                after: "Skills: Hard-working, Punctual, plus the core tools of your industry",
            },
            IssueKind::NoSoftSkills => ExamplePair {
                before: "Skills: Excel, SQL",
                after: "Skills: Excel, SQL, Communication, Leadership",
            },
            IssueKind::EducationMissing => ExamplePair {
                before: "(no education section)",
                after: "BSc Business Management, University of Leeds, 2018",
            },
            IssueKind::MissingGraduationDates => ExamplePair {
                before: "BSc Business Management, University of Leeds",
                after: "BSc Business Management, University of Leeds, 2018",
            },
            IssueKind::Custom(_) => GENERIC_EXAMPLE,
        }
    }
}

impl From<String> for IssueKind {
    fn from(text: String) -> Self {
        IssueKind::known()
            .into_iter()
            .find(|k| k.message() == text)
            .unwrap_or(IssueKind::Custom(text))
    }
}

impl From<IssueKind> for String {
    fn from(kind: IssueKind) -> Self {
        kind.message().to_string()
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_unique() {
        let known = IssueKind::known();
        for (i, a) in known.iter().enumerate() {
            for b in &known[i + 1..] {
                assert_ne!(a.message(), b.message());
                assert_ne!(a.slug(), b.slug());
            }
        }
    }

    #[test]
    fn test_known_message_parses_back_to_variant() {
        for kind in IssueKind::known() {
            let text: String = kind.clone().into();
            assert_eq!(IssueKind::from(text), kind);
        }
    }

    #[test]
    fn test_unknown_message_becomes_custom() {
        let kind = IssueKind::from("Photo included".to_string());
        assert_eq!(kind, IssueKind::Custom("Photo included".to_string()));
        assert_eq!(kind.penalty(), 0);
        assert_eq!(kind.section(), None);
        assert_eq!(kind.example(), GENERIC_EXAMPLE);
        assert_eq!(kind.slug(), "photo-included");
    }

    #[test]
    fn test_serializes_as_message_string() {
        let json = serde_json::to_string(&IssueKind::MissingGraduationDates).unwrap();
        assert_eq!(json, r#""Missing graduation dates""#);
        let back: IssueKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, IssueKind::MissingGraduationDates);
    }

    #[test]
    fn test_every_known_kind_belongs_to_a_section() {
        for kind in IssueKind::known() {
            assert!(kind.section().is_some(), "{kind} has no section");
            assert!(kind.penalty() > 0);
            assert_ne!(kind.example(), GENERIC_EXAMPLE);
        }
    }
}
