//! Industry classification against a static, process-wide keyword table.
//!
//! Matching is case-insensitive substring containment with no stemming, so
//! `"java"` also counts inside `"javascript"`. Ties between categories resolve
//! to whichever category appears first in `INDUSTRY_TABLE`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Technology,
    Hospitality,
    Finance,
    Healthcare,
    Education,
    Management,
    Sales,
}

/// One row of the classification table. Keywords are lowercase literals.
#[derive(Debug)]
pub struct IndustryCategory {
    pub industry: Industry,
    pub keywords: &'static [&'static str],
}

/// Table order is the tie-break order.
pub static INDUSTRY_TABLE: &[IndustryCategory] = &[
    IndustryCategory {
        industry: Industry::Technology,
        keywords: &[
            "software",
            "developer",
            "javascript",
            "typescript",
            "react",
            "python",
            "java",
            "node.js",
            "sql",
            "rest api",
            "docker",
            "kubernetes",
            "aws",
            "cloud",
            "devops",
            "programming",
            "web development",
            "version control",
        ],
    },
    IndustryCategory {
        industry: Industry::Hospitality,
        keywords: &[
            "hospitality",
            "restaurant",
            "hotel",
            "steward",
            "guest relations",
            "customer service",
            "food and beverage",
            "catering",
            "front desk",
            "housekeeping",
            "chef",
            "kitchen",
            "bartender",
            "reservations",
            "cruise",
        ],
    },
    IndustryCategory {
        industry: Industry::Finance,
        keywords: &[
            "finance",
            "financial",
            "accounting",
            "accountant",
            "audit",
            "budgeting",
            "forecasting",
            "banking",
            "investment",
            "taxation",
            "reconciliation",
            "ledger",
            "payroll",
            "spreadsheets",
            "compliance",
        ],
    },
    IndustryCategory {
        industry: Industry::Healthcare,
        keywords: &[
            "healthcare",
            "patient",
            "clinical",
            "nursing",
            "nurse",
            "medical",
            "medication",
            "care plan",
            "nhs",
            "pharmacy",
            "therapy",
            "diagnosis",
        ],
    },
    IndustryCategory {
        industry: Industry::Education,
        keywords: &[
            "teacher",
            "teaching",
            "curriculum",
            "classroom",
            "lesson plan",
            "pupils",
            "safeguarding",
            "tutor",
            "lecturer",
            "pedagogy",
            "special educational needs",
            "learners",
        ],
    },
    IndustryCategory {
        industry: Industry::Management,
        keywords: &[
            "management",
            "manager",
            "stakeholder",
            "strategic planning",
            "operations",
            "kpi",
            "budget management",
            "cross-functional",
            "team lead",
            "process improvement",
            "change management",
            "p&l",
        ],
    },
    IndustryCategory {
        industry: Industry::Sales,
        keywords: &[
            "sales",
            "business development",
            "account management",
            "crm",
            "lead generation",
            "revenue",
            "quota",
            "negotiation",
            "client acquisition",
            "b2b",
            "cold calling",
            "salesforce",
            "upselling",
        ],
    },
];

/// Soft skills merged into every industry keyword universe.
pub const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "time management",
    "adaptability",
    "collaboration",
    "attention to detail",
];

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Hospitality => "hospitality",
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Education => "education",
            Industry::Management => "management",
            Industry::Sales => "sales",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        INDUSTRY_TABLE
            .iter()
            .find(|c| c.industry == *self)
            .map(|c| c.keywords)
            .unwrap_or(&[])
    }
}

/// Number of keywords from `keywords` contained in `text_lower`.
pub fn count_keywords(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text_lower.contains(*k)).count()
}

/// Per-category hit counts in table order.
pub fn industry_scores(text: &str) -> Vec<(Industry, usize)> {
    let lower = text.to_lowercase();
    INDUSTRY_TABLE
        .iter()
        .map(|c| (c.industry, count_keywords(&lower, c.keywords)))
        .collect()
}

/// Returns the category with the strictly highest hit count, first-in-table on
/// ties, or `None` when nothing matches.
pub fn classify(text: &str) -> Option<Industry> {
    let mut best: Option<(Industry, usize)> = None;
    for (industry, count) in industry_scores(text) {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((industry, count)),
        }
    }
    best.map(|(industry, _)| industry)
}
