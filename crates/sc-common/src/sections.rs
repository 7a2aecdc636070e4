//! Heading-based section splitting for CVs and job postings.
//!
//! PDF text extraction often collapses headings into the surrounding text,
//! so before scanning we re-inject line breaks around every known heading
//! synonym, then accumulate body lines under the most recent heading.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

/// Heading synonyms for one document family, in declared order.
pub struct SectionVocabulary {
    entries: Vec<VocabularyEntry>,
    // Single whole-word alternation over every synonym, longest first so
    // multi-word headings are consumed atomically during injection.
    inject: Regex,
}

struct VocabularyEntry {
    section: &'static str,
    synonyms: Vec<&'static str>,
}

lazy_static! {
    /// CV sections: skills / experience / education / languages.
    pub static ref CV_SECTIONS: SectionVocabulary = SectionVocabulary::new(&[
        (
            "skills",
            &[
                "compétences techniques",
                "technical skills",
                "compétences",
                "compétence",
                "skills",
                "skill",
            ],
        ),
        (
            "experience",
            &[
                "expérience professionnelle",
                "work experience",
                "expériences",
                "expérience",
                "experience",
            ],
        ),
        ("education", &["formation", "éducation", "education", "studies"]),
        ("languages", &["langues", "langue", "languages", "language"]),
    ]);

    /// Job posting sections (en/fr headings commonly seen in offers).
    pub static ref JOB_SECTIONS: SectionVocabulary = SectionVocabulary::new(&[
        (
            "responsibilities",
            &[
                "responsibilities",
                "missions",
                "responsabilites",
                "responsabilités",
                "votre rôle",
                "votre role",
                "vos missions",
            ],
        ),
        (
            "requirements",
            &["requirements", "profil", "requis", "qualifications", "prerequis", "prérequis"],
        ),
        (
            "skills",
            &[
                "compétences requises",
                "compétences clés",
                "competences techniques",
                "technical skills",
                "hard skills",
                "competences",
                "compétences",
                "skills",
            ],
        ),
        (
            "soft_skills",
            &["soft skills", "qualites", "qualités humaines", "savoir être", "savoir-être"],
        ),
        ("benefits", &["benefits", "avantages", "perks"]),
        (
            "company",
            &["about us", "a propos de nous", "a propos", "à propos", "company"],
        ),
    ]);
}

impl SectionVocabulary {
    fn new(entries: &[(&'static str, &[&'static str])]) -> Self {
        let mut all_synonyms: Vec<&'static str> = entries
            .iter()
            .flat_map(|(_, synonyms)| synonyms.iter().copied())
            .collect();
        all_synonyms.sort_by_key(|synonym| std::cmp::Reverse(synonym.chars().count()));

        let alternation = all_synonyms
            .iter()
            .map(|synonym| regex::escape(synonym))
            .collect::<Vec<_>>()
            .join("|");
        let inject =
            Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("section synonym regex");

        let entries = entries
            .iter()
            .map(|(section, synonyms)| VocabularyEntry {
                section,
                synonyms: synonyms.to_vec(),
            })
            .collect();

        Self { entries, inject }
    }

    /// Puts every heading synonym on its own line so that line scanning
    /// works even when layout extraction glued headings to body text.
    fn inject_heading_breaks(&self, text: &str) -> String {
        self.inject.replace_all(text, "\n$1\n").into_owned()
    }

    /// Returns the section name if the line reads as one of its headings.
    fn detect_heading(&self, line: &str) -> Option<&'static str> {
        let normalized = line
            .to_lowercase()
            .trim_matches(|c| matches!(c, ' ' | ':' | '-' | '•' | '\t'))
            .to_string();
        for entry in &self.entries {
            for synonym in &entry.synonyms {
                if normalized.starts_with(synonym) && boundary_after(&normalized, synonym.len()) {
                    return Some(entry.section);
                }
            }
        }
        None
    }
}

fn boundary_after(text: &str, prefix_len: usize) -> bool {
    text[prefix_len..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Splits raw text into labeled sections.
///
/// Lines before the first recognized heading are dropped; if no heading is
/// ever detected the result is empty and callers fall back to the full
/// document. A heading that reappears later restarts its bucket, so only
/// the last contiguous run of a section is kept.
pub fn split_sections(text: &str, vocabulary: &SectionVocabulary) -> BTreeMap<&'static str, String> {
    let injected = vocabulary.inject_heading_breaks(text);

    let mut sections: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
    let mut current: Option<&'static str> = None;

    for line in injected.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(section) = vocabulary.detect_heading(line) {
            current = Some(section);
            sections.insert(section, Vec::new());
            continue;
        }

        if let Some(section) = current {
            sections.entry(section).or_default().push(line);
        }
    }

    sections
        .into_iter()
        .map(|(section, lines)| (section, lines.join("\n").trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cv_text_on_headings() {
        let text = "SKILLS\nPython, SQL\nEXPERIENCE\n2020 Analyst at X";
        let sections = split_sections(text, &CV_SECTIONS);

        assert_eq!(sections.get("skills").map(String::as_str), Some("Python, SQL"));
        assert_eq!(
            sections.get("experience").map(String::as_str),
            Some("2020 Analyst at X")
        );
    }

    #[test]
    fn detects_headings_glued_into_flat_text() {
        // Layout extraction collapsed everything onto one line.
        let text = "Compétences Python, SQL Formation Master Data Science";
        let sections = split_sections(text, &CV_SECTIONS);

        assert_eq!(sections.get("skills").map(String::as_str), Some("Python, SQL"));
        assert_eq!(
            sections.get("education").map(String::as_str),
            Some("Master Data Science")
        );
    }

    #[test]
    fn heading_detection_handles_bullets_case_and_accents() {
        let text = "• SKILLS\nRust\nÉducation\nLicence Informatique";
        let sections = split_sections(text, &CV_SECTIONS);

        assert_eq!(sections.get("skills").map(String::as_str), Some("Rust"));
        assert_eq!(
            sections.get("education").map(String::as_str),
            Some("Licence Informatique")
        );
    }

    #[test]
    fn text_without_headings_yields_empty_map() {
        let sections = split_sections("just a paragraph of prose", &CV_SECTIONS);
        assert!(sections.is_empty());
    }

    #[test]
    fn lines_before_first_heading_are_dropped() {
        let text = "Jean Dupont\njean.dupont@example.com\nSKILLS\nPython";
        let sections = split_sections(text, &CV_SECTIONS);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get("skills").map(String::as_str), Some("Python"));
    }

    #[test]
    fn repeated_heading_keeps_last_contiguous_run() {
        let text = "SKILLS\nPython\nEXPERIENCE\n2020 Analyst\nSKILLS\nRust";
        let sections = split_sections(text, &CV_SECTIONS);

        assert_eq!(sections.get("skills").map(String::as_str), Some("Rust"));
        assert_eq!(
            sections.get("experience").map(String::as_str),
            Some("2020 Analyst")
        );
    }

    #[test]
    fn job_vocabulary_recognizes_french_offer_headings() {
        let text = "Vos missions\nConstruire des pipelines\nProfil\nCurieux et rigoureux\nAvantages\nTickets resto";
        let sections = split_sections(text, &JOB_SECTIONS);

        assert_eq!(
            sections.get("responsibilities").map(String::as_str),
            Some("Construire des pipelines")
        );
        assert_eq!(
            sections.get("requirements").map(String::as_str),
            Some("Curieux et rigoureux")
        );
        assert_eq!(sections.get("benefits").map(String::as_str), Some("Tickets resto"));
    }

    #[test]
    fn multi_word_heading_is_consumed_atomically() {
        let text = "Compétences requises: Python, Machine Learning, Power BI.";
        let sections = split_sections(text, &JOB_SECTIONS);

        assert_eq!(
            sections.get("skills").map(String::as_str),
            Some(": Python, Machine Learning, Power BI.")
        );
    }
}
