//! Structured parsing of job postings and `analyze_job`.
//!
//! Shares the section-splitting mechanism with the CV side but adds
//! posting-specific heuristics: title, seniority, contract type, salary
//! range, location, languages and a keyword vocabulary scan. Values
//! supplied by the recruiter always take precedence over extracted ones.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::profile::clean_text;
use crate::sections::{split_sections, JOB_SECTIONS};
use crate::{ContractType, JobCriteria, JobProfile, Seniority};

const MAX_TITLE_CHARS: usize = 200;

// Role keywords scanned over raw lines to pick the job title.
const ROLE_KEYWORDS: [&str; 16] = [
    "engineer",
    "developer",
    "manager",
    "analyst",
    "designer",
    "scientist",
    "lead",
    "architect",
    "owner",
    "intern",
    "stagiaire",
    "logistique",
    "supply chain",
    "performance",
    "projet",
    "consultant",
];

// Fixed tech/business vocabulary scanned over the whole lowered text.
// Entries only match as standalone words, so "r" never matches the "r"
// inside "power bi" or "docker".
const KEYWORD_VOCABULARY: [&str; 45] = [
    "python",
    "r",
    "sql",
    "power bi",
    "tableau",
    "excel",
    "pandas",
    "spark",
    "dbt",
    "airflow",
    "machine learning",
    "deep learning",
    "nlp",
    "rag",
    "llm",
    "pytorch",
    "tensorflow",
    "cloud",
    "azure",
    "aws",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "javascript",
    "typescript",
    "react",
    "vue",
    "node",
    "java",
    "c#",
    "dotnet",
    "go",
    "rust",
    "logistique",
    "supply chain",
    "sap",
    "erp",
    "finance",
    "comptabilite",
    "comptabilité",
    "risk",
    "assurance",
    "scrum",
    "git",
];

// Lines opening with these phrases are prose, not skills.
const SKILL_LINE_STOPWORDS: [&str; 3] = ["que vous", "dont vous", "si vous pensez"];

lazy_static! {
    // Ordered: all matches across both patterns are collected, minimum wins.
    static ref JOB_EXPERIENCE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d+)\s*ans? d[' ]exp").unwrap(),
        Regex::new(r"(\d+)\s*years?").unwrap(),
    ];
    // Numbers followed by k/ke/euros are read as thousands.
    static ref SALARY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d{2,3})\s*k\b").unwrap(),
        Regex::new(r"(\d{2,3})\s*ke\b").unwrap(),
        Regex::new(r"(\d+)\s*euros").unwrap(),
    ];
    static ref LOCATION_RE: Regex = Regex::new(
        r"(paris|lyon|lille|nantes|bordeaux|remote|teletravail|télétravail|idf|ile-de-france|levallois(?:-|\s)?perret)"
    )
    .unwrap();
    static ref JOB_SKILL_SPLIT_RE: Regex = Regex::new(r"[•\n]").unwrap();
}

/// Analyzes a job posting into the canonical job profile.
///
/// Recruiter criteria override extracted values field by field. When the
/// recruiter supplies no required skills, the keyword vocabulary scan
/// (falling back to the skills section) stands in for them.
pub fn analyze_job(description: &str, overrides: Option<&JobCriteria>) -> JobProfile {
    let defaults = JobCriteria::default();
    let criteria = overrides.unwrap_or(&defaults);

    let raw_lines: Vec<&str> = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let cleaned = clean_text(description);
    let lowered = cleaned.to_lowercase();
    let sections = split_sections(&cleaned, &JOB_SECTIONS);

    let keywords = criteria
        .keywords
        .clone()
        .unwrap_or_else(|| detect_keywords(&lowered));

    let section_skills = sections
        .get("skills")
        .map(|text| parse_skills_section(text))
        .unwrap_or_default();

    let required_skills = criteria.required_skills.clone().unwrap_or_else(|| {
        if !keywords.is_empty() {
            keywords.clone()
        } else {
            section_skills
        }
    });

    let exp_min = criteria.exp_min.or_else(|| extract_exp_min(&lowered));
    let exp_max = criteria.exp_max;
    if let (Some(min), Some(max)) = (exp_min, exp_max) {
        if min > max {
            warn!(exp_min = min, exp_max = max, "job experience range is inverted");
        }
    }

    let (salary_min, salary_max) = extract_salary_range(&lowered);

    JobProfile {
        id: String::new(),
        title: criteria
            .title
            .clone()
            .unwrap_or_else(|| detect_title(&raw_lines)),
        seniority: criteria.seniority.unwrap_or_else(|| detect_seniority(&lowered)),
        exp_min,
        exp_max,
        required_skills,
        optional_skills: criteria.optional_skills.clone().unwrap_or_default(),
        languages: criteria
            .languages
            .clone()
            .unwrap_or_else(|| detect_languages(&lowered)),
        location: criteria
            .location
            .clone()
            .unwrap_or_else(|| detect_location(&lowered)),
        contract: criteria.contract.unwrap_or_else(|| detect_contract(&lowered)),
        salary_min: criteria.salary_min.or(salary_min),
        salary_max: criteria.salary_max.or(salary_max),
        keywords,
        raw_text: cleaned,
    }
}

/// First raw line containing a role keyword; else the first non-empty line.
pub fn detect_title(raw_lines: &[&str]) -> String {
    let chosen = raw_lines
        .iter()
        .find(|line| {
            let lowered = line.to_lowercase();
            ROLE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
        })
        .or_else(|| raw_lines.first());

    match chosen {
        Some(line) => line.chars().take(MAX_TITLE_CHARS).collect(),
        None => String::new(),
    }
}

pub fn detect_seniority(lowered: &str) -> Seniority {
    if ["junior", "debutant", "débutant", "entry"]
        .iter()
        .any(|k| lowered.contains(k))
    {
        return Seniority::Junior;
    }
    if ["senior", "experimente", "expérimenté", "lead"]
        .iter()
        .any(|k| lowered.contains(k))
    {
        return Seniority::Senior;
    }
    if ["alternance", "apprentissage", "intern"]
        .iter()
        .any(|k| lowered.contains(k))
    {
        return Seniority::Intern;
    }
    Seniority::Intermediate
}

pub fn detect_contract(lowered: &str) -> ContractType {
    if lowered.contains("cdi") {
        ContractType::Cdi
    } else if lowered.contains("cdd") {
        ContractType::Cdd
    } else if lowered.contains("stage") || lowered.contains("intern") {
        ContractType::Stage
    } else if lowered.contains("alternance") || lowered.contains("apprentissage") {
        ContractType::Alternance
    } else if lowered.contains("freelance")
        || lowered.contains("indep")
        || lowered.contains("indépendant")
    {
        ContractType::Freelance
    } else {
        ContractType::Unspecified
    }
}

/// First match against the fixed city/remote alternation, or empty string.
pub fn detect_location(lowered: &str) -> String {
    LOCATION_RE
        .find(lowered)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn detect_languages(lowered: &str) -> Vec<String> {
    let mut languages = Vec::new();
    if lowered.contains("anglais") || lowered.contains("english") {
        languages.push("anglais".to_string());
    }
    if lowered.contains("francais") || lowered.contains("français") || lowered.contains("french") {
        languages.push("francais".to_string());
    }
    if lowered.contains("espagnol") || lowered.contains("spanish") {
        languages.push("espagnol".to_string());
    }
    if lowered.contains("allemand") || lowered.contains("german") {
        languages.push("allemand".to_string());
    }
    languages
}

// Whole-word containment: both neighbors of the matched span must be
// non-alphanumeric (or text edges). Manual scan instead of `\b` so that
// entries ending in punctuation ("c#") still terminate on a boundary.
fn contains_word(lowered: &str, keyword: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = lowered[from..].find(keyword) {
        let begin = from + offset;
        let end = begin + keyword.len();
        let before_ok = lowered[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = lowered[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        from = end;
    }
    false
}

/// Whole-word scan of the fixed keyword vocabulary, in declared order.
pub fn detect_keywords(lowered: &str) -> Vec<String> {
    KEYWORD_VOCABULARY
        .iter()
        .filter(|keyword| contains_word(lowered, keyword))
        .map(|keyword| (*keyword).to_string())
        .collect()
}

/// Minimum experience over every number matched by the experience patterns.
pub fn extract_exp_min(lowered: &str) -> Option<u32> {
    JOB_EXPERIENCE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(lowered))
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
        .min()
}

/// Salary range over every match, in thousands of euros.
pub fn extract_salary_range(lowered: &str) -> (Option<u32>, Option<u32>) {
    let amounts: Vec<u32> = SALARY_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(lowered))
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
        .collect();

    (
        amounts.iter().min().map(|min| min * 1000),
        amounts.iter().max().map(|max| max * 1000),
    )
}

/// Skill list from a posting's skills section: bullet/newline split,
/// prose lines and short fragments dropped, first-seen order kept.
pub fn parse_skills_section(section_text: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for raw in JOB_SKILL_SPLIT_RE.split(section_text) {
        let item = raw.trim_matches(|c| matches!(c, ' ' | ':' | '-' | '\t'));
        if item.chars().count() < 3 {
            continue;
        }
        let lowered = item.to_lowercase();
        if SKILL_LINE_STOPWORDS
            .iter()
            .any(|stopword| lowered.starts_with(stopword))
        {
            continue;
        }
        if !skills.iter().any(|existing| existing == item) {
            skills.push(item.to_string());
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFER: &str = "\
Data Scientist

Nous recherchons un Data Scientist avec 2 ans d'expérience minimum.
Compétences requises: Python, Machine Learning, Power BI.
Langues: Français, Anglais.
CDI basé à Paris, salaire 45k-55k.
";

    #[test]
    fn analyzes_a_french_posting_end_to_end() {
        let job = analyze_job(OFFER, None);

        assert_eq!(job.title, "Data Scientist");
        assert_eq!(job.exp_min, Some(2));
        assert_eq!(job.exp_max, None);
        assert!(job.required_skills.contains(&"python".to_string()));
        assert!(job.required_skills.contains(&"machine learning".to_string()));
        assert!(job.required_skills.contains(&"power bi".to_string()));
        assert_eq!(job.languages, vec!["anglais", "francais"]);
        assert_eq!(job.contract, ContractType::Cdi);
        assert_eq!(job.location, "paris");
        assert_eq!(job.salary_min, Some(45_000));
        assert_eq!(job.salary_max, Some(55_000));
    }

    #[test]
    fn recruiter_criteria_override_extracted_values() {
        let criteria = JobCriteria {
            title: Some("Lead Data Engineer".into()),
            exp_min: Some(5),
            required_skills: Some(vec!["spark".into(), "airflow".into()]),
            languages: Some(vec!["anglais".into()]),
            ..JobCriteria::default()
        };
        let job = analyze_job(OFFER, Some(&criteria));

        assert_eq!(job.title, "Lead Data Engineer");
        assert_eq!(job.exp_min, Some(5));
        assert_eq!(job.required_skills, vec!["spark", "airflow"]);
        assert_eq!(job.languages, vec!["anglais"]);
        // Non-overridden fields still come from extraction.
        assert_eq!(job.contract, ContractType::Cdi);
    }

    #[test]
    fn title_falls_back_to_first_line() {
        assert_eq!(detect_title(&["Offre 2024", "autre ligne"]), "Offre 2024");
        assert_eq!(detect_title(&[]), "");

        let long = "architect ".repeat(40);
        let title = detect_title(&[long.as_str()]);
        assert_eq!(title.chars().count(), 200);
    }

    #[test]
    fn seniority_and_contract_detection() {
        assert_eq!(detect_seniority("profil junior accepté"), Seniority::Junior);
        assert_eq!(detect_seniority("tech lead confirmé"), Seniority::Senior);
        assert_eq!(detect_seniority("contrat en alternance"), Seniority::Intern);
        assert_eq!(detect_seniority("poste confirmé"), Seniority::Intermediate);

        assert_eq!(detect_contract("poste en cdd de 6 mois"), ContractType::Cdd);
        assert_eq!(detect_contract("mission freelance"), ContractType::Freelance);
        assert_eq!(detect_contract("rien d'indiqué"), ContractType::Unspecified);
    }

    #[test]
    fn experience_minimum_takes_smallest_match() {
        assert_eq!(extract_exp_min("3 ans d'exp ou 5 years pour le niveau 2"), Some(3));
        assert_eq!(extract_exp_min("aucune exigence"), None);
    }

    #[test]
    fn salary_range_reads_thousands() {
        assert_eq!(extract_salary_range("entre 40k et 52 k brut"), (Some(40_000), Some(52_000)));
        assert_eq!(extract_salary_range("pas de fourchette"), (None, None));
    }

    #[test]
    fn keyword_scan_keeps_declared_order_and_requires_standalone_words() {
        let keywords = detect_keywords("stack: python, docker, tableau");
        assert_eq!(keywords, vec!["python", "tableau", "docker"]);

        // "r" only matches as a standalone word.
        assert_eq!(detect_keywords("langage r utilisé"), vec!["r"]);
        assert_eq!(detect_keywords("rust only"), vec!["rust"]);
        assert_eq!(detect_keywords("maîtrise de power bi"), vec!["power bi"]);
        assert_eq!(detect_keywords("développeur c# confirmé"), vec!["c#"]);
    }

    #[test]
    fn single_letter_keywords_do_not_leak_into_required_skills() {
        let job = analyze_job(OFFER, None);
        assert_eq!(
            job.required_skills,
            vec!["python", "power bi", "machine learning"]
        );
    }

    #[test]
    fn skills_section_parsing_drops_prose_lines() {
        let skills = parse_skills_section(
            "• Python\n• SQL avancé\nQue vous soyez curieux\n- ML",
        );
        assert_eq!(skills, vec!["Python", "SQL avancé"]);
    }

    #[test]
    fn inverted_experience_range_is_kept_but_flagged() {
        let criteria = JobCriteria {
            exp_min: Some(8),
            exp_max: Some(3),
            ..JobCriteria::default()
        };
        let job = analyze_job(OFFER, Some(&criteria));
        assert_eq!(job.exp_min, Some(8));
        assert_eq!(job.exp_max, Some(3));
    }
}
