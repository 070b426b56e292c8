//! Section segmentation: splits raw CV text into contact, summary, experience,
//! skills and education regions.
//!
//! Two passes:
//! 1. `segment_by_headings` classifies each line against a closed heading
//!    vocabulary and assigns every following line to that section until the
//!    next heading.
//! 2. `segment_by_anchors` is used when no heading line is recognised. It takes
//!    the maximum match index among a section's anchor words as the section
//!    start, so a late anchor hit inside prose can shift a boundary.

use serde::{Deserialize, Serialize};

const MAX_HEADING_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Contact,
    Summary,
    Experience,
    Skills,
    Education,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Contact,
        Section::Summary,
        Section::Experience,
        Section::Skills,
        Section::Education,
    ];

    /// Pipeline order used by anchor segmentation.
    pub const BODY: [Section; 4] = [
        Section::Summary,
        Section::Experience,
        Section::Skills,
        Section::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Contact => "contact",
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Skills => "skills",
            Section::Education => "education",
        }
    }

    fn anchors(&self) -> &'static [&'static str] {
        match self {
            Section::Contact => &[],
            Section::Summary => &["summary", "objective", "profile"],
            Section::Experience => &["experience", "employment", "work"],
            Section::Skills => &["skills", "technical skills"],
            Section::Education => &["education", "qualifications"],
        }
    }

    fn headings(&self) -> &'static [&'static str] {
        match self {
            Section::Contact => &["contact", "contact details", "contact information"],
            Section::Summary => &[
                "summary",
                "professional summary",
                "career summary",
                "executive summary",
                "objective",
                "career objective",
                "profile",
                "professional profile",
                "personal profile",
                "about me",
                "personal statement",
            ],
            Section::Experience => &[
                "experience",
                "work experience",
                "professional experience",
                "relevant experience",
                "employment",
                "employment history",
                "work history",
                "career history",
            ],
            Section::Skills => &[
                "skills",
                "technical skills",
                "key skills",
                "core skills",
                "core competencies",
                "competencies",
                "skills and abilities",
                "areas of expertise",
            ],
            Section::Education => &[
                "education",
                "qualifications",
                "education and qualifications",
                "education and training",
                "academic background",
                "academic qualifications",
            ],
        }
    }
}

/// Derived regions of a CV. Every field is a copy; the input text is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub contact: String,
    pub summary: String,
    pub experience: String,
    pub skills: String,
    pub education: String,
}

impl Segments {
    fn get_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Contact => &mut self.contact,
            Section::Summary => &mut self.summary,
            Section::Experience => &mut self.experience,
            Section::Skills => &mut self.skills,
            Section::Education => &mut self.education,
        }
    }
}

/// Segments `text`, preferring heading lines and falling back to anchor search.
pub fn segment(text: &str) -> Segments {
    segment_by_headings(text).unwrap_or_else(|| segment_by_anchors(text))
}

// ────────────────────────────────────────────────────────────────────────────
// Heading-line pass
// ────────────────────────────────────────────────────────────────────────────

/// Returns `None` when no line is recognised as a section heading.
pub fn segment_by_headings(text: &str) -> Option<Segments> {
    let mut segments = Segments::default();
    let mut current = Section::Contact;
    let mut saw_heading = false;

    for line in text.lines() {
        match classify_heading(line) {
            Some((section, rest)) => {
                saw_heading = true;
                current = section;
                if !rest.is_empty() {
                    push_line(segments.get_mut(current), rest);
                }
            }
            None => {
                if !line.trim().is_empty() {
                    push_line(segments.get_mut(current), line.trim_end());
                }
            }
        }
    }

    saw_heading.then_some(segments)
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

/// Classifies a line as a heading. Supports bare headings (`EXPERIENCE`,
/// `## Work History`, `**Skills:**`) and inline ones (`Skills: Rust, SQL`), in
/// which case the text after the colon is returned as section content.
fn classify_heading(line: &str) -> Option<(Section, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() <= MAX_HEADING_CHARS {
        if let Some(section) = lookup_heading(trimmed) {
            return Some((section, ""));
        }
    }

    // Inline content may be any length; only the label is capped.
    let (label, rest) = trimmed.split_once(':')?;
    if label.chars().count() > MAX_HEADING_CHARS {
        return None;
    }
    lookup_heading(label).map(|section| (section, rest.trim()))
}

fn lookup_heading(raw: &str) -> Option<Section> {
    let normalized = normalize_heading(raw);
    if normalized.is_empty() {
        return None;
    }
    Section::ALL
        .into_iter()
        .find(|s| s.headings().contains(&normalized.as_str()))
}

fn normalize_heading(raw: &str) -> String {
    let stripped = raw.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '#' | '*' | '_' | ':' | '=' | '-' | '|')
    });
    stripped
        .to_lowercase()
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Anchor pass
// ────────────────────────────────────────────────────────────────────────────

/// Anchor-keyword segmentation over the ASCII-lowercased text.
///
/// A section starts at the maximum index among its anchors and ends at the
/// nearest later start of a section that follows it in pipeline order, or at
/// end of text. Sections with no anchor hit are empty. Contact is everything
/// before the earliest section start.
pub fn segment_by_anchors(text: &str) -> Segments {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();

    let starts: Vec<(Section, Option<usize>)> = Section::BODY
        .into_iter()
        .map(|section| {
            let start = section
                .anchors()
                .iter()
                .filter_map(|anchor| lower.find(anchor))
                .max();
            (section, start)
        })
        .collect();

    let mut segments = Segments::default();

    for (i, (section, start)) in starts.iter().enumerate() {
        let Some(start) = *start else {
            continue;
        };
        let end = starts[i + 1..]
            .iter()
            .filter_map(|(_, s)| *s)
            .filter(|s| *s > start)
            .min()
            .unwrap_or(text.len());
        *segments.get_mut(*section) = text[start..end].trim().to_string();
    }

    let first_start = starts.iter().filter_map(|(_, s)| *s).min();
    segments.contact = match first_start {
        Some(start) => text[..start].trim().to_string(),
        None => text.trim().to_string(),
    };

    segments
}
