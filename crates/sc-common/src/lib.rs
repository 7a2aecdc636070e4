pub mod error;
pub mod extraction;
pub mod job_parser;
pub mod llm;
pub mod logging;
pub mod matching;
pub mod pipeline;
pub mod profile;
pub mod sections;
pub mod store;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

// Commonly used data models consumed by the matching functions.

/// Seniority band of a job posting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum Seniority {
    Junior,
    #[default]
    Intermediate,
    Senior,
    Intern,
}

/// Contract type detected in a job posting (French labels as used by postings).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[strum(serialize = "CDI")]
    Cdi,
    #[strum(serialize = "CDD")]
    Cdd,
    #[strum(serialize = "Stage")]
    Stage,
    #[strum(serialize = "Alternance")]
    Alternance,
    #[strum(serialize = "Freelance")]
    Freelance,
    #[default]
    #[strum(serialize = "")]
    Unspecified,
}

/// Highest education level found in a candidate document.
/// Tier order matters: doctorat > master > licence > bac.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum EducationLevel {
    Doctorat,
    Master,
    Licence,
    Bac,
    #[default]
    Unknown,
}

/// Recommendation band derived from the global score via fixed thresholds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    #[strum(serialize = "fortement recommandé")]
    StronglyRecommended,
    #[strum(serialize = "recommandé")]
    Recommended,
    #[strum(serialize = "à considérer")]
    ToConsider,
    #[default]
    #[strum(serialize = "à rejeter")]
    Rejected,
}

/// Structured target profile built from a job posting.
/// Built once per evaluation run and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobProfile {
    pub id: String,
    pub title: String,
    pub seniority: Seniority,
    pub exp_min: Option<u32>,
    pub exp_max: Option<u32>,
    pub required_skills: Vec<String>,
    pub optional_skills: Vec<String>,
    pub languages: Vec<String>,
    pub location: String,
    pub contract: ContractType,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub keywords: Vec<String>,
    pub raw_text: String,
}

/// Recruiter-supplied criteria. Any populated field takes precedence over
/// the value extracted from the posting text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobCriteria {
    pub title: Option<String>,
    pub seniority: Option<Seniority>,
    pub exp_min: Option<u32>,
    pub exp_max: Option<u32>,
    pub required_skills: Option<Vec<String>>,
    pub optional_skills: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub location: Option<String>,
    pub contract: Option<ContractType>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub keywords: Option<Vec<String>>,
}

/// One diploma line found in the education section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Diploma {
    pub kind: String,
    pub description: String,
}

/// One dated experience entry from the experience section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExperienceEntry {
    pub year: String,
    pub description: String,
}

/// Structured candidate record built from a CV (and optional cover letter).
/// Built once per source document and immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CandidateProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub years_experience: u32,
    pub education_level: EducationLevel,
    pub diplomas: Vec<Diploma>,
    pub experiences: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub skills_text: String,
    pub experience_text: String,
    pub education_text: String,
    pub languages_text: String,
    pub cover_letter: Option<String>,
    pub raw_text: String,
}

impl CandidateProfile {
    /// Languages as declared in the languages section (comma separated).
    pub fn languages(&self) -> Vec<String> {
        self.languages_text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn cover_letter_text(&self) -> &str {
        self.cover_letter.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_labels_are_french() {
        assert_eq!(
            Recommendation::StronglyRecommended.to_string(),
            "fortement recommandé"
        );
        assert_eq!(Recommendation::Rejected.to_string(), "à rejeter");
    }

    #[test]
    fn contract_type_displays_posting_labels() {
        assert_eq!(ContractType::Cdi.to_string(), "CDI");
        assert_eq!(ContractType::Unspecified.to_string(), "");
    }

    #[test]
    fn candidate_languages_come_from_languages_text() {
        let candidate = CandidateProfile {
            languages_text: "anglais, francais,\n espagnol".into(),
            ..CandidateProfile::default()
        };
        assert_eq!(candidate.languages(), vec!["anglais", "francais", "espagnol"]);

        let empty = CandidateProfile::default();
        assert!(empty.languages().is_empty());
    }
}
