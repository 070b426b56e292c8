//! Contact extraction: independent regex patterns applied to the full CV text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\d{2,5}\)?[\s.-]?\d{3,4}[\s.-]?\d{3,4}\b").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/([A-Za-z0-9_-]+)").unwrap());

/// Recognised location names, in canonical spelling.
const LOCATIONS: &[&str] = &[
    "London",
    "Manchester",
    "Birmingham",
    "Leeds",
    "Glasgow",
    "Edinburgh",
    "Bristol",
    "Liverpool",
    "Cardiff",
    "Belfast",
    "Dublin",
    "New York",
    "San Francisco",
    "Los Angeles",
    "Chicago",
    "Toronto",
    "Vancouver",
    "Sydney",
    "Melbourne",
    "Dubai",
    "Abu Dhabi",
    "Singapore",
    "Berlin",
    "Paris",
    "Amsterdam",
    "Madrid",
    "Lagos",
    "Nairobi",
    "Johannesburg",
    "Cape Town",
    "Accra",
    "Mumbai",
    "Bangalore",
    "United Kingdom",
    "United States",
    "Remote",
];

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = LOCATIONS.iter().map(|l| regex::escape(l)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).unwrap()
});

/// Structured contact fields. Each is an empty string when not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub location: String,
}

impl ContactFields {
    pub fn present_count(&self) -> usize {
        [&self.email, &self.phone, &self.linkedin, &self.location]
            .iter()
            .filter(|f| !f.is_empty())
            .count()
    }
}

pub fn extract_contact(text: &str) -> ContactFields {
    ContactFields {
        email: extract_email(text),
        phone: extract_phone(text),
        linkedin: extract_linkedin(text),
        location: extract_location(text),
    }
}

fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn extract_phone(text: &str) -> String {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| candidate.chars().filter(|c| c.is_ascii_digit()).count() >= 9)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Returns `linkedin.com/in/<slug>` with the slug as written.
fn extract_linkedin(text: &str) -> String {
    LINKEDIN_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|slug| format!("linkedin.com/in/{}", slug.as_str()))
        .unwrap_or_default()
}

/// Earliest recognised location in the text, in canonical spelling.
fn extract_location(text: &str) -> String {
    LOCATION_RE
        .find(text)
        .and_then(|m| {
            LOCATIONS
                .iter()
                .find(|l| l.eq_ignore_ascii_case(m.as_str()))
        })
        .map(|l| l.to_string())
        .unwrap_or_default()
}
