//! Final decision: global score, recommendation band, justification text,
//! ranking and the selection report.

use serde::Serialize;
use tracing::{debug, warn};

use crate::llm::{Justifier, JustifierError, NullJustifier};
use crate::matching::scoring::{ProfileAssessment, SoftSkillsAssessment, TechnicalAssessment};
use crate::matching::weights::DecisionWeights;
use crate::Recommendation;

/// Recommendation band cut-offs on the global score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Thresholds {
    pub strongly_recommended: f64,
    pub recommended: f64,
    pub to_consider: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strongly_recommended: 80.0,
            recommended: 60.0,
            to_consider: 40.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionConfig {
    pub weights: DecisionWeights,
    pub thresholds: Thresholds,
    pub top_n: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            weights: DecisionWeights::default(),
            thresholds: Thresholds::default(),
            top_n: 5,
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.parse().ok()
}

impl DecisionConfig {
    /// Reads `SC_WEIGHT_PROFILE`, `SC_WEIGHT_TECHNICAL`,
    /// `SC_WEIGHT_SOFT_SKILLS` and `SC_TOP_N`. The weights are only applied
    /// when all three are set and sum to 1.0; anything else keeps the
    /// defaults and logs what was ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let weights = match (
            env_f64("SC_WEIGHT_PROFILE"),
            env_f64("SC_WEIGHT_TECHNICAL"),
            env_f64("SC_WEIGHT_SOFT_SKILLS"),
        ) {
            (Some(profile), Some(technical), Some(soft_skills)) => {
                match DecisionWeights::new(profile, technical, soft_skills) {
                    Ok(weights) => weights,
                    Err(err) => {
                        warn!(error = %err, "ignoring decision weights from environment");
                        defaults.weights
                    }
                }
            }
            _ => defaults.weights,
        };

        let top_n = std::env::var("SC_TOP_N")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(defaults.top_n);

        Self {
            weights,
            thresholds: defaults.thresholds,
            top_n,
        }
    }
}

/// Full evaluation of one candidate against one job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    pub candidate_id: String,
    pub score_profile: f64,
    pub score_technical: f64,
    pub score_softskills: f64,
    pub score_global: f64,
    pub recommendation: Recommendation,
    pub justification: String,
    pub skills_matched: Vec<String>,
    pub skills_missing: Vec<String>,
    pub skills_bonus: Vec<String>,
    pub coverage: f64,
    pub soft_skills_detected: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportStatistics {
    pub total_candidates: usize,
    pub score_moyen: f64,
    pub score_max: f64,
    pub score_min: f64,
}

/// Selection report over a whole evaluation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    pub top_candidates: Vec<Evaluation>,
    pub resume: String,
    pub statistics: ReportStatistics,
}

/// Combines the three assessments into a recommendation with justification.
///
/// The justification is delegated to a [`Justifier`]; any failure or empty
/// answer falls back to a deterministic French template, so a decision is
/// always produced.
pub struct DecisionEngine {
    config: DecisionConfig,
    justifier: Box<dyn Justifier>,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self::with_justifier(config, Box::new(NullJustifier))
    }

    pub fn with_justifier(config: DecisionConfig, justifier: Box<dyn Justifier>) -> Self {
        Self { config, justifier }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn classify(&self, score_global: f64) -> Recommendation {
        let thresholds = &self.config.thresholds;
        if score_global >= thresholds.strongly_recommended {
            Recommendation::StronglyRecommended
        } else if score_global >= thresholds.recommended {
            Recommendation::Recommended
        } else if score_global >= thresholds.to_consider {
            Recommendation::ToConsider
        } else {
            Recommendation::Rejected
        }
    }

    pub fn decide(
        &self,
        candidate_id: &str,
        profile: &ProfileAssessment,
        technical: &TechnicalAssessment,
        soft_skills: &SoftSkillsAssessment,
    ) -> Evaluation {
        let weights = &self.config.weights;
        let score_global = (weights.profile * profile.score
            + weights.technical * technical.score
            + weights.soft_skills * soft_skills.score)
            .clamp(0.0, 100.0);
        let recommendation = self.classify(score_global);

        let justification = self.justification(
            candidate_id,
            score_global,
            recommendation,
            profile,
            technical,
            soft_skills,
        );

        Evaluation {
            candidate_id: candidate_id.to_string(),
            score_profile: profile.score,
            score_technical: technical.score,
            score_softskills: soft_skills.score,
            score_global,
            recommendation,
            justification,
            skills_matched: technical.skills_matched.clone(),
            skills_missing: technical.skills_missing.clone(),
            skills_bonus: technical.skills_bonus.clone(),
            coverage: technical.coverage,
            soft_skills_detected: soft_skills.detected.clone(),
        }
    }

    fn justification(
        &self,
        candidate_id: &str,
        score_global: f64,
        recommendation: Recommendation,
        profile: &ProfileAssessment,
        technical: &TechnicalAssessment,
        soft_skills: &SoftSkillsAssessment,
    ) -> String {
        let fallback = fallback_justification(
            candidate_id,
            score_global,
            recommendation,
            profile,
            technical,
            soft_skills,
        );

        let prompt = justification_prompt(
            candidate_id,
            score_global,
            recommendation,
            profile,
            technical,
            soft_skills,
        );
        match self.justifier.generate(&prompt) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                debug!(candidate_id, "justifier returned empty text, using template");
                fallback
            }
            Err(JustifierError::Unavailable) => fallback,
            Err(err) => {
                warn!(
                    candidate_id,
                    justifier = self.justifier.name(),
                    error = %err,
                    "justifier failed, using template"
                );
                fallback
            }
        }
    }

    /// Stable descending sort on the global score.
    pub fn rank(&self, mut evaluations: Vec<Evaluation>) -> Vec<Evaluation> {
        evaluations.sort_by(|a, b| {
            b.score_global
                .partial_cmp(&a.score_global)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        evaluations
    }

    /// Builds the selection report. Statistics cover every evaluation, not
    /// just the retained top candidates; an empty run yields zeroed stats.
    pub fn summarize(&self, ranked: &[Evaluation]) -> Report {
        let statistics = if ranked.is_empty() {
            ReportStatistics::default()
        } else {
            let scores: Vec<f64> = ranked.iter().map(|e| e.score_global).collect();
            ReportStatistics {
                total_candidates: ranked.len(),
                score_moyen: scores.iter().sum::<f64>() / scores.len() as f64,
                score_max: scores.iter().cloned().fold(f64::MIN, f64::max),
                score_min: scores.iter().cloned().fold(f64::MAX, f64::min),
            }
        };

        let top_n = self.config.top_n.min(ranked.len());
        let top_candidates: Vec<Evaluation> = ranked[..top_n].to_vec();

        let mut resume = format!(
            "Rapport de sélection - {} candidat(s) évalué(s)\n",
            ranked.len()
        );
        if !top_candidates.is_empty() {
            resume.push_str("\nTop candidats:\n");
            for (position, evaluation) in top_candidates.iter().enumerate() {
                resume.push_str(&format!(
                    "{}. {} - {:.1}/100 ({})\n",
                    position + 1,
                    evaluation.candidate_id,
                    evaluation.score_global,
                    evaluation.recommendation
                ));
            }
        }
        resume.push_str(&format!(
            "\nScore moyen: {:.1}/100\nScore max: {:.1}/100\nScore min: {:.1}/100",
            statistics.score_moyen, statistics.score_max, statistics.score_min
        ));

        Report {
            top_candidates,
            resume,
            statistics,
        }
    }
}

fn non_empty(label: &str, commentary: &str) -> Option<String> {
    let trimmed = commentary.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("{label}: {trimmed}"))
    }
}

fn fallback_justification(
    candidate_id: &str,
    score_global: f64,
    recommendation: Recommendation,
    profile: &ProfileAssessment,
    technical: &TechnicalAssessment,
    soft_skills: &SoftSkillsAssessment,
) -> String {
    let mut lines = vec![
        format!("Candidat: {candidate_id}"),
        format!("Score global: {score_global:.1}/100"),
        format!(
            "Recommandation: {}",
            recommendation.to_string().to_uppercase()
        ),
        String::new(),
        "Détail des scores:".to_string(),
        format!("- Profil: {:.1}/100", profile.score),
        format!("- Technique: {:.1}/100", technical.score),
        format!("- Soft Skills: {:.1}/100", soft_skills.score),
        String::new(),
        "Justifications:".to_string(),
    ];
    lines.extend(non_empty("Profil", &profile.commentary));
    lines.extend(non_empty("Technique", &technical.commentary));
    lines.extend(non_empty("Soft Skills", &soft_skills.commentary));
    lines.join("\n")
}

fn justification_prompt(
    candidate_id: &str,
    score_global: f64,
    recommendation: Recommendation,
    profile: &ProfileAssessment,
    technical: &TechnicalAssessment,
    soft_skills: &SoftSkillsAssessment,
) -> String {
    format!(
        "Tu es un expert en recrutement. Rédige une justification concise \
         (5 lignes maximum, en français) de la décision suivante.\n\n\
         Candidat: {candidate_id}\n\
         Score global: {score_global:.1}/100\n\
         Recommandation: {recommendation}\n\n\
         Analyse du profil: {}\n\
         Analyse technique: {}\n\
         Analyse des soft skills: {}",
        profile.commentary, technical.commentary, soft_skills.commentary
    )
}
