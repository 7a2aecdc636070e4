//! Score formulas and per-axis assessments.
//!
//! Three axes are assessed independently: overall profile fit, technical
//! skill coverage and soft skills read from the cover letter. Each
//! assessment carries a 0-100 score plus a short French commentary that
//! feeds the final justification.

use serde::Serialize;

use crate::{CandidateProfile, JobProfile};

/// Soft-skill categories detected in cover letters, with their keyword
/// triggers (French terms plus accent-stripped variants). The category
/// count is part of the score formula.
pub const SOFT_SKILL_CATEGORIES: [(&str, &[&str]); 7] = [
    (
        "teamwork",
        &["équipe", "equipe", "collaboration", "teamwork", "collaborer"],
    ),
    (
        "communication",
        &["communication", "communiquer", "présenter", "presenter", "expliquer"],
    ),
    (
        "leadership",
        &["lead", "leader", "diriger", "management", "gérer", "gerer"],
    ),
    (
        "autonomy",
        &["autonome", "autonomie", "indépendant", "independant", "indépendance", "independance"],
    ),
    (
        "problem_solving",
        &["résoudre", "resoudre", "solution", "problème", "probleme", "challenge"],
    ),
    (
        "adaptability",
        &["adaptable", "flexible", "changement", "évolution", "evolution"],
    ),
    (
        "motivation",
        &["motivé", "motive", "motivation", "passion", "intéressé", "interesse", "enthousiaste"],
    ),
];

/// Overall profile fit (skills + experience + languages).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileAssessment {
    pub score: f64,
    pub commentary: String,
}

/// Required-skill coverage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TechnicalAssessment {
    pub score: f64,
    pub skills_matched: Vec<String>,
    pub skills_missing: Vec<String>,
    pub skills_bonus: Vec<String>,
    pub coverage: f64,
    pub commentary: String,
}

/// Soft skills read from the cover letter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SoftSkillsAssessment {
    pub score: f64,
    pub detected: Vec<String>,
    pub commentary: String,
}

// Case-insensitive, whitespace-trimmed set semantics: " Python " and
// "python" are the same skill, "mysql" and "sql" are not.
fn skill_matches(candidate_skill: &str, target: &str) -> bool {
    let candidate = candidate_skill.trim().to_lowercase();
    let target = target.trim().to_lowercase();
    !candidate.is_empty() && candidate == target
}

fn count_matches(candidate_skills: &[String], targets: &[String]) -> usize {
    targets
        .iter()
        .filter(|target| candidate_skills.iter().any(|skill| skill_matches(skill, target)))
        .count()
}

/// Skill match on required (70 pts) and optional (30 pts) skills.
/// No required skills at all reads as "nothing to check": neutral 50.
pub fn skill_match_score(
    candidate_skills: &[String],
    required: &[String],
    optional: &[String],
) -> f64 {
    if required.is_empty() {
        return 50.0;
    }
    let required_ratio = count_matches(candidate_skills, required) as f64 / required.len() as f64;
    let optional_ratio = if optional.is_empty() {
        0.0
    } else {
        count_matches(candidate_skills, optional) as f64 / optional.len() as f64
    };
    (70.0 * required_ratio + 30.0 * optional_ratio).clamp(0.0, 100.0)
}

/// Experience fit against the posting's range.
/// Below the minimum costs 10 points per missing year; beyond the maximum
/// costs 5 points per extra year but never drops under 70.
pub fn experience_score(years: u32, exp_min: Option<u32>, exp_max: Option<u32>) -> f64 {
    let Some(min) = exp_min else {
        return 50.0;
    };
    if years < min {
        return (50.0 - 10.0 * f64::from(min - years)).max(0.0);
    }
    if let Some(max) = exp_max {
        if years > max {
            return (100.0 - 5.0 * f64::from(years - max)).max(70.0);
        }
    }
    100.0
}

/// Fraction of required languages the candidate declares, scaled to 100.
pub fn language_match_score(candidate_languages: &[String], required: &[String]) -> f64 {
    if required.is_empty() {
        return 100.0;
    }
    let overlap = required
        .iter()
        .filter(|language| {
            candidate_languages
                .iter()
                .any(|declared| skill_matches(declared, language))
        })
        .count();
    100.0 * overlap as f64 / required.len() as f64
}

/// Soft-skill category names triggered by the letter text.
pub fn detect_soft_skills(letter: &str) -> Vec<String> {
    let lowered = letter.to_lowercase();
    SOFT_SKILL_CATEGORIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(category, _)| (*category).to_string())
        .collect()
}

/// Cover-letter score: 60 pts for category breadth, 40 pts for echoing the
/// posting's keywords, up to 10 bonus points for letter length (1 per 50
/// words). Categories and keywords are searched in the letter and the
/// experience section combined; the length bonus reads the letter alone.
/// A missing letter is neutral 50, never a penalty.
pub fn soft_skills_score(letter: &str, experience_text: &str, job_keywords: &[String]) -> f64 {
    if letter.trim().is_empty() {
        return 50.0;
    }
    let combined = format!("{letter} {experience_text}").to_lowercase();

    let detected = detect_soft_skills(&combined).len();
    let category_part = 60.0 * detected as f64 / SOFT_SKILL_CATEGORIES.len() as f64;

    let keyword_part = if job_keywords.is_empty() {
        0.0
    } else {
        let echoed = job_keywords
            .iter()
            .filter(|keyword| combined.contains(&keyword.to_lowercase()))
            .count();
        40.0 * echoed as f64 / job_keywords.len() as f64
    };

    let words = letter.split_whitespace().count();
    let length_bonus = (words as f64 / 50.0).min(10.0);

    (category_part + keyword_part + length_bonus).clamp(0.0, 100.0)
}

/// Composite profile score: 50% skills, 30% experience, 20% languages.
pub fn profile_score(skill: f64, experience: f64, language: f64) -> f64 {
    (0.5 * skill + 0.3 * experience + 0.2 * language).clamp(0.0, 100.0)
}

fn score_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "excellent"
    } else if score >= 60.0 {
        "bon"
    } else if score >= 40.0 {
        "moyen"
    } else {
        "faible"
    }
}

fn coverage_level(coverage: f64) -> &'static str {
    if coverage >= 0.8 {
        "excellent"
    } else if coverage >= 0.6 {
        "bon"
    } else if coverage >= 0.4 {
        "moyen"
    } else {
        "insuffisant"
    }
}

fn join_commentary(parts: Vec<String>) -> String {
    if parts.is_empty() {
        return String::new();
    }
    format!("{}.", parts.join(". "))
}

fn preview(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Assesses overall profile fit and writes its commentary.
pub fn assess_profile(candidate: &CandidateProfile, job: &JobProfile) -> ProfileAssessment {
    let skill = skill_match_score(&candidate.skills, &job.required_skills, &job.optional_skills);
    let experience = experience_score(candidate.years_experience, job.exp_min, job.exp_max);
    let language = language_match_score(&candidate.languages(), &job.languages);
    let score = profile_score(skill, experience, language);

    let matched: Vec<String> = job
        .required_skills
        .iter()
        .filter(|required| {
            candidate
                .skills
                .iter()
                .any(|skill| skill_matches(skill, required))
        })
        .cloned()
        .collect();

    let mut parts = vec![format!("Profil {}", score_level(score))];
    if !matched.is_empty() {
        parts.push(format!("Compétences correspondantes: {}", preview(&matched, 5)));
    }
    match job.exp_min {
        Some(min) if candidate.years_experience < min => parts.push(format!(
            "Expérience insuffisante ({} ans, requis: {})",
            candidate.years_experience, min
        )),
        _ => parts.push(format!(
            "Expérience adéquate ({} ans)",
            candidate.years_experience
        )),
    }

    ProfileAssessment {
        score,
        commentary: join_commentary(parts),
    }
}

/// Assesses required-skill coverage. Optional skills never count here,
/// so the score is entirely driven by the required list.
pub fn assess_technical(candidate: &CandidateProfile, job: &JobProfile) -> TechnicalAssessment {
    let (matched, missing): (Vec<String>, Vec<String>) = job
        .required_skills
        .iter()
        .cloned()
        .partition(|required| {
            candidate
                .skills
                .iter()
                .any(|skill| skill_matches(skill, required))
        });

    let mut bonus: Vec<String> = candidate
        .skills
        .iter()
        .filter(|skill| {
            !job.required_skills
                .iter()
                .any(|required| skill_matches(skill, required))
        })
        .cloned()
        .collect();
    bonus.sort();

    let coverage = if job.required_skills.is_empty() {
        0.0
    } else {
        matched.len() as f64 / job.required_skills.len() as f64
    };
    let score = skill_match_score(&candidate.skills, &job.required_skills, &[]);

    let mut parts = Vec::new();
    if !matched.is_empty() {
        parts.push(format!(
            "Compétences techniques maîtrisées: {}",
            preview(&matched, 5)
        ));
    }
    if !missing.is_empty() {
        parts.push(format!("Compétences manquantes: {}", preview(&missing, 5)));
    }
    if !bonus.is_empty() {
        parts.push(format!("Compétences bonus: {}", preview(&bonus, 3)));
    }
    parts.push(format!(
        "Score technique: {:.1}/100 ({}, {}/{} compétences)",
        score,
        coverage_level(coverage),
        matched.len(),
        job.required_skills.len()
    ));

    TechnicalAssessment {
        score,
        skills_matched: matched,
        skills_missing: missing,
        skills_bonus: bonus,
        coverage,
        commentary: join_commentary(parts),
    }
}

/// Assesses the cover letter. Absence of a letter is stated explicitly in
/// the commentary rather than penalized in the score.
pub fn assess_soft_skills(candidate: &CandidateProfile, job: &JobProfile) -> SoftSkillsAssessment {
    let letter = candidate.cover_letter_text();
    if letter.trim().is_empty() {
        return SoftSkillsAssessment {
            score: 50.0,
            detected: Vec::new(),
            commentary: "Aucune lettre de motivation fournie.".to_string(),
        };
    }

    let score = soft_skills_score(letter, &candidate.experience_text, &job.keywords);
    let lowered = format!("{letter} {}", candidate.experience_text).to_lowercase();
    let detected = detect_soft_skills(&lowered);
    let echoed: Vec<String> = job
        .keywords
        .iter()
        .filter(|keyword| lowered.contains(&keyword.to_lowercase()))
        .cloned()
        .collect();

    let length = letter.chars().count();
    let mut parts = vec![if length > 200 {
        "Lettre de motivation détaillée et structurée".to_string()
    } else if length > 100 {
        "Lettre de motivation correcte".to_string()
    } else {
        "Lettre de motivation courte".to_string()
    }];
    if !detected.is_empty() {
        parts.push(format!("Soft skills détectés: {}", preview(&detected, 5)));
    }
    if !echoed.is_empty() {
        parts.push(format!(
            "Mots-clés recherchés trouvés: {}",
            preview(&echoed, 3)
        ));
    }

    SoftSkillsAssessment {
        score,
        detected,
        commentary: join_commentary(parts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn skill_match_weights_required_and_optional() {
        let candidate = skills(&["Python", "SQL", "Docker"]);
        let required = skills(&["python", "sql"]);
        let optional = skills(&["docker", "kubernetes"]);

        // 70 * 2/2 + 30 * 1/2
        assert!((skill_match_score(&candidate, &required, &optional) - 85.0).abs() < 1e-9);
        // No optional list drops the 30-point component entirely.
        assert!((skill_match_score(&candidate, &required, &[]) - 70.0).abs() < 1e-9);
        // Nothing required reads as neutral.
        assert!((skill_match_score(&candidate, &[], &optional) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn skill_matching_normalizes_case_and_whitespace_only() {
        let candidate = skills(&["  Python ", "Machine Learning"]);
        let required = skills(&["python", "machine learning"]);
        assert!((skill_match_score(&candidate, &required, &[]) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_skill_sets_score_zero() {
        // "mysql" is not "sql": no substring credit in either direction.
        assert_eq!(skill_match_score(&skills(&["mysql"]), &skills(&["sql"]), &[]), 0.0);
        assert_eq!(skill_match_score(&skills(&["Power BI"]), &skills(&["r"]), &[]), 0.0);
    }

    #[test]
    fn experience_score_covers_all_branches() {
        assert_eq!(experience_score(3, None, None), 50.0);
        assert_eq!(experience_score(5, Some(2), Some(8)), 100.0);
        // 2 years short of the minimum.
        assert_eq!(experience_score(3, Some(5), None), 30.0);
        // Far short never goes negative.
        assert_eq!(experience_score(0, Some(9), None), 0.0);
        // 4 years over the maximum.
        assert_eq!(experience_score(12, Some(2), Some(8)), 80.0);
        // Overqualification floors at 70.
        assert_eq!(experience_score(30, Some(2), Some(8)), 70.0);
    }

    #[test]
    fn language_score_is_overlap_fraction() {
        let candidate = skills(&["anglais", "espagnol"]);
        assert_eq!(language_match_score(&candidate, &skills(&["anglais", "francais"])), 50.0);
        assert_eq!(language_match_score(&candidate, &[]), 100.0);
        assert_eq!(language_match_score(&[], &skills(&["anglais"])), 0.0);
    }

    #[test]
    fn soft_skills_score_combines_categories_keywords_and_length() {
        let letter = "Je suis autonome et flexible, motivé par le travail en équipe. \
                      J'utilise python au quotidien.";
        let keywords = skills(&["python", "sql"]);

        // 4 categories / 7, 1 keyword / 2, short letter.
        let expected = 60.0 * 4.0 / 7.0 + 40.0 * 0.5 + (15.0 / 50.0);
        assert!((soft_skills_score(letter, "", &keywords) - expected).abs() < 1e-9);

        assert_eq!(soft_skills_score("", "", &keywords), 50.0);
        assert_eq!(soft_skills_score("   ", "", &keywords), 50.0);
    }

    #[test]
    fn experience_text_contributes_categories_but_not_length() {
        let letter = "Candidature motivée pour ce poste.";
        let experience = "2020 Management d'une équipe de cinq analystes";

        // motivation from the letter, leadership + teamwork from experience.
        let with_experience = soft_skills_score(letter, experience, &[]);
        let without = soft_skills_score(letter, "", &[]);
        assert!((with_experience - without - 60.0 * 2.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn detected_soft_skills_keep_category_order() {
        let detected = detect_soft_skills("Esprit d'équipe, grande autonomie, très motivé");
        assert_eq!(detected, vec!["teamwork", "autonomy", "motivation"]);
    }

    #[test]
    fn common_letter_wordings_trigger_their_categories() {
        let detected =
            detect_soft_skills("j'aime résoudre chaque problème, gérer le changement");
        assert_eq!(detected, vec!["leadership", "problem_solving", "adaptability"]);

        assert_eq!(detect_soft_skills("ma passion pour ce métier"), vec!["motivation"]);
        assert_eq!(detect_soft_skills("savoir expliquer et présenter"), vec!["communication"]);
    }

    #[test]
    fn profile_assessment_commentary_mentions_experience_gap() {
        let candidate = CandidateProfile {
            skills: skills(&["python"]),
            years_experience: 1,
            ..CandidateProfile::default()
        };
        let job = JobProfile {
            required_skills: skills(&["python", "sql"]),
            exp_min: Some(4),
            ..JobProfile::default()
        };

        let assessment = assess_profile(&candidate, &job);
        assert!(assessment.commentary.contains("Compétences correspondantes: python"));
        assert!(assessment.commentary.contains("Expérience insuffisante (1 ans, requis: 4)"));
    }

    #[test]
    fn technical_assessment_partitions_and_scores() {
        let candidate = CandidateProfile {
            skills: skills(&["Python", "Docker", "Airflow"]),
            ..CandidateProfile::default()
        };
        let job = JobProfile {
            required_skills: skills(&["python", "sql", "spark"]),
            ..JobProfile::default()
        };

        let assessment = assess_technical(&candidate, &job);
        assert_eq!(assessment.skills_matched, vec!["python"]);
        assert_eq!(assessment.skills_missing, vec!["sql", "spark"]);
        assert_eq!(assessment.skills_bonus, vec!["Airflow", "Docker"]);
        assert!((assessment.coverage - 1.0 / 3.0).abs() < 1e-9);
        assert!((assessment.score - 70.0 / 3.0).abs() < 1e-9);
        assert!(assessment.commentary.contains("Compétences manquantes: sql, spark"));
        assert!(assessment.commentary.contains("(insuffisant, 1/3 compétences)"));
    }

    #[test]
    fn soft_skills_assessment_without_letter_is_neutral() {
        let candidate = CandidateProfile::default();
        let job = JobProfile::default();

        let assessment = assess_soft_skills(&candidate, &job);
        assert_eq!(assessment.score, 50.0);
        assert!(assessment.detected.is_empty());
        assert_eq!(assessment.commentary, "Aucune lettre de motivation fournie.");
    }

    #[test]
    fn soft_skills_assessment_reads_letter_length_and_keywords() {
        let letter = "Je suis très motivé par ce poste. ".repeat(8);
        let candidate = CandidateProfile {
            cover_letter: Some(letter),
            ..CandidateProfile::default()
        };
        let job = JobProfile {
            keywords: skills(&["python"]),
            ..JobProfile::default()
        };

        let assessment = assess_soft_skills(&candidate, &job);
        assert!(assessment.commentary.contains("détaillée et structurée"));
        assert_eq!(assessment.detected, vec!["motivation"]);
        assert!(!assessment.commentary.contains("Mots-clés"));
    }
}
