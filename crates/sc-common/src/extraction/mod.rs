//! Atomic fact extraction from free text.
//!
//! Every function here is a pure, independently testable heuristic. A miss
//! is never an error: each extractor resolves to a documented default
//! (empty string, 0, `Unknown`, empty list).

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Diploma, EducationLevel, ExperienceEntry};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    // Run of 8+ digit-like characters, allowing a leading + and separators.
    static ref PHONE_RE: Regex = Regex::new(r"\+?\d[\d .\-]{7,}\d").unwrap();
    // 4-digit year anchor, 1900-2099.
    static ref YEAR_RE: Regex = Regex::new(r"(19|20)\d{2}").unwrap();
    static ref TEN_DIGIT_RUN_RE: Regex = Regex::new(r"\d{10}").unwrap();
    static ref SKILL_SPLIT_RE: Regex = Regex::new(r"[;,•\-]\s*").unwrap();

    // Ordered list of experience patterns. First successful pattern wins,
    // in declared order; downstream behavior depends on that order.
    static ref EXPERIENCE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d+)\s*ans?\s*d[' ]?exp").unwrap(),
        Regex::new(r"(\d+)\s*years?\s*of\s*experience").unwrap(),
        Regex::new(r"(\d+)\+?\s*ans?").unwrap(),
        Regex::new(r"expérience\s*:\s*(\d+)").unwrap(),
    ];
}

// Education tiers, checked in priority order: a text mentioning both
// "master" and "bac" classifies as master.
const EDUCATION_TIERS: [(EducationLevel, &[&str]); 4] = [
    (EducationLevel::Doctorat, &["doctorat", "phd", "ph.d"]),
    (EducationLevel::Master, &["master", "m2", "m1", "msc", "ms"]),
    (EducationLevel::Licence, &["licence", "bachelor", "bsc", "l3"]),
    (EducationLevel::Bac, &["bac", "baccalauréat", "high school"]),
];

const DIPLOMA_TYPES: [&str; 8] = [
    "master",
    "licence",
    "bachelor",
    "doctorat",
    "phd",
    "bts",
    "dut",
    "ingénieur",
];

/// First email-shaped substring, or empty string.
pub fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First phone-shaped substring, or empty string.
pub fn extract_phone(text: &str) -> String {
    PHONE_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Years of experience claimed in the text; 0 when no pattern matches.
pub fn extract_years_of_experience(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    for pattern in EXPERIENCE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&lowered) {
            if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                return years;
            }
        }
    }
    0
}

/// Highest education tier whose keywords appear in the text.
pub fn extract_education_level(text: &str) -> EducationLevel {
    let lowered = text.to_lowercase();
    for (level, keywords) in EDUCATION_TIERS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return level;
        }
    }
    EducationLevel::Unknown
}

/// Cleans a skills-section blob into a deduplicated skill list,
/// preserving first-seen order.
pub fn parse_skills(skills_text: &str) -> Vec<String> {
    if skills_text.is_empty() {
        return Vec::new();
    }

    let unified = skills_text.replace('\n', ",");
    let mut cleaned: Vec<String> = Vec::new();
    for item in SKILL_SPLIT_RE.split(&unified) {
        let trimmed = item.trim();
        if trimmed.chars().count() < 2 {
            continue;
        }
        if !cleaned.iter().any(|existing| existing == trimmed) {
            cleaned.push(trimmed.to_string());
        }
    }
    cleaned
}

/// Diploma lines from the education section; first matching type per line wins.
pub fn extract_diplomas(education_text: &str) -> Vec<Diploma> {
    let mut diplomas = Vec::new();
    for raw in education_text.lines() {
        let line = raw.trim();
        if line.chars().count() < 5 {
            continue;
        }
        let lowered = line.to_lowercase();
        for kind in DIPLOMA_TYPES {
            if lowered.contains(kind) {
                diplomas.push(Diploma {
                    kind: kind.to_string(),
                    description: line.to_string(),
                });
                break;
            }
        }
    }
    diplomas
}

/// Structured experience entries from the experience section.
///
/// A line containing a 4-digit year starts a new entry; following lines
/// append to its description until the next year line or a blank line.
pub fn extract_experience_entries(experience_text: &str) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut current: Option<ExperienceEntry> = None;

    for raw in experience_text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            continue;
        }

        if let Some(year) = YEAR_RE.find(line) {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(ExperienceEntry {
                year: year.as_str().to_string(),
                description: line.to_string(),
            });
        } else if let Some(entry) = current.as_mut() {
            entry.description.push(' ');
            entry.description.push_str(line);
        }
    }

    if let Some(entry) = current {
        entries.push(entry);
    }
    entries
}

/// Naive "probably a name" heuristic over the top of the document:
/// first of the first five non-empty lines that is 4-49 characters long,
/// contains no `@` and no 10-digit run. Empty string if none qualifies.
pub fn extract_name(text: &str) -> String {
    for line in text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(5)
    {
        let length = line.chars().count();
        if length > 3
            && length < 50
            && !line.contains('@')
            && !TEN_DIGIT_RUN_RE.is_match(line)
        {
            return line.to_string();
        }
    }
    String::new()
}
