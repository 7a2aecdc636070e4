//! Candidate profile construction from raw CV text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extraction::{
    extract_diplomas, extract_email, extract_experience_entries, extract_name, extract_phone,
    extract_years_of_experience,
};
use crate::sections::{split_sections, CV_SECTIONS};
use crate::{extraction, CandidateProfile};

lazy_static! {
    static ref NON_ID_RE: Regex = Regex::new(r"[^a-z0-9_]+").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Deterministic identifier derived from a source filename stem:
/// lowercased, runs of non-alphanumerics collapsed to `_`.
pub fn candidate_id_from_filename(stem: &str) -> String {
    NON_ID_RE
        .replace_all(&stem.to_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

/// Collapses all whitespace runs to single spaces.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(&text.replace('\r', " "), " ")
        .trim()
        .to_string()
}

/// Builds the canonical candidate record from raw CV text.
///
/// Extraction misses resolve to defaults (empty strings, 0, `Unknown`);
/// profile construction itself never fails.
pub fn build_candidate_profile(
    id: impl Into<String>,
    raw_text: &str,
    cover_letter: Option<&str>,
) -> CandidateProfile {
    let sections = split_sections(raw_text, &CV_SECTIONS);
    let section_text = |name: &str| sections.get(name).cloned().unwrap_or_default();

    let skills_text = section_text("skills");
    let experience_text = section_text("experience");
    let education_text = section_text("education");
    let languages_text = section_text("languages");

    CandidateProfile {
        id: id.into(),
        name: extract_name(raw_text),
        email: extract_email(raw_text),
        phone: extract_phone(raw_text),
        years_experience: extract_years_of_experience(raw_text),
        education_level: extraction::extract_education_level(&education_text),
        diplomas: extract_diplomas(&education_text),
        experiences: extract_experience_entries(&experience_text),
        skills: extraction::parse_skills(&skills_text),
        skills_text,
        experience_text,
        education_text,
        languages_text,
        cover_letter: cover_letter
            .map(str::trim)
            .filter(|letter| !letter.is_empty())
            .map(String::from),
        raw_text: raw_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EducationLevel;

    const CV: &str = "\
Jean Dupont
jean.dupont@example.com
+33 6 12 34 56 78
5 ans d'expérience en data

COMPÉTENCES
Python, SQL, Power BI

EXPERIENCE
2021 Data Analyst chez Acme
2019 Consultant BI

FORMATION
Master Data Science - Université de Lille

LANGUES
francais, anglais
";

    #[test]
    fn builds_full_profile_from_cv_text() {
        let profile = build_candidate_profile("jean_dupont", CV, None);

        assert_eq!(profile.id, "jean_dupont");
        assert_eq!(profile.name, "Jean Dupont");
        assert_eq!(profile.email, "jean.dupont@example.com");
        assert_eq!(profile.phone, "+33 6 12 34 56 78");
        assert_eq!(profile.years_experience, 5);
        assert_eq!(profile.education_level, EducationLevel::Master);
        assert_eq!(profile.skills, vec!["Python", "SQL", "Power BI"]);
        assert_eq!(profile.experiences.len(), 2);
        assert_eq!(profile.experiences[0].year, "2021");
        assert_eq!(profile.diplomas.len(), 1);
        assert_eq!(profile.diplomas[0].kind, "master");
        assert_eq!(profile.languages(), vec!["francais", "anglais"]);
        assert!(profile.cover_letter.is_none());
    }

    #[test]
    fn blank_cover_letter_is_treated_as_absent() {
        let profile = build_candidate_profile("x", CV, Some("   "));
        assert!(profile.cover_letter.is_none());

        let with_letter = build_candidate_profile("x", CV, Some("Je suis motivé."));
        assert_eq!(with_letter.cover_letter.as_deref(), Some("Je suis motivé."));
    }

    #[test]
    fn cv_without_headings_still_builds_a_profile() {
        let profile = build_candidate_profile("vide", "texte sans la moindre rubrique", None);

        assert!(profile.skills.is_empty());
        assert!(profile.experiences.is_empty());
        assert_eq!(profile.education_level, EducationLevel::Unknown);
        assert_eq!(profile.years_experience, 0);
        assert_eq!(profile.email, "");
    }

    #[test]
    fn candidate_id_is_deterministic_slug() {
        assert_eq!(candidate_id_from_filename("CV Jean-Dupont (2024)"), "cv_jean_dupont_2024");
        assert_eq!(candidate_id_from_filename("___"), "");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("a\r\n b\t\tc  d\n"), "a b c d");
    }
}
