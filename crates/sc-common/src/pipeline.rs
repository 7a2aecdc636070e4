//! End-to-end screening pipeline: job analysis, optional candidate
//! pre-selection, per-candidate evaluation, ranking and reporting.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::IndexError;
use crate::job_parser;
use crate::llm::Justifier;
use crate::matching::{DecisionConfig, DecisionEngine, Evaluation, Report};
use crate::matching::scoring::{assess_profile, assess_soft_skills, assess_technical};
use crate::{CandidateProfile, JobCriteria, JobProfile};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pre-selection width when an index is plugged in.
    pub top_k: usize,
    pub parallel: bool,
    pub decision: DecisionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            parallel: false,
            decision: DecisionConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads `SC_TOP_K` and `SC_PARALLEL` on top of
    /// [`DecisionConfig::from_env`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            top_k: std::env::var("SC_TOP_K")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.top_k),
            parallel: std::env::var("SC_PARALLEL")
                .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.parallel),
            decision: DecisionConfig::from_env(),
        }
    }
}

/// One pre-selection hit from a candidate index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub candidate_id: String,
    pub score: f64,
}

/// Optional similarity index used to narrow the candidate pool before the
/// full evaluation runs.
pub trait CandidateIndex: Send + Sync {
    fn query_by_job_profile(
        &self,
        job: &JobProfile,
        top_k: usize,
    ) -> Result<Vec<IndexHit>, IndexError>;
}

/// Result of a full screening run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScreeningOutcome {
    pub job_profile: JobProfile,
    pub evaluations: Vec<Evaluation>,
    pub report: Report,
}

pub struct ScreeningPipeline {
    engine: DecisionEngine,
    config: PipelineConfig,
}

impl ScreeningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let engine = DecisionEngine::new(config.decision.clone());
        Self { engine, config }
    }

    pub fn with_justifier(config: PipelineConfig, justifier: Box<dyn Justifier>) -> Self {
        let engine = DecisionEngine::with_justifier(config.decision.clone(), justifier);
        Self { engine, config }
    }

    pub fn analyze_job(&self, description: &str, criteria: Option<&JobCriteria>) -> JobProfile {
        job_parser::analyze_job(description, criteria)
    }

    /// Evaluates one candidate against the job.
    pub fn evaluate(&self, candidate: &CandidateProfile, job: &JobProfile) -> Evaluation {
        let profile = assess_profile(candidate, job);
        let technical = assess_technical(candidate, job);
        let soft_skills = assess_soft_skills(candidate, job);
        self.engine
            .decide(&candidate.id, &profile, &technical, &soft_skills)
    }

    /// Evaluates every candidate and returns the ranked list.
    pub fn evaluate_all(
        &self,
        candidates: &[&CandidateProfile],
        job: &JobProfile,
    ) -> Vec<Evaluation> {
        let evaluations: Vec<Evaluation> = if self.config.parallel {
            candidates
                .par_iter()
                .map(|candidate| self.evaluate(candidate, job))
                .collect()
        } else {
            candidates
                .iter()
                .map(|candidate| self.evaluate(candidate, job))
                .collect()
        };
        self.engine.rank(evaluations)
    }

    /// Narrows the pool through the index when one is available. Index
    /// failures and empty answers both fall back to the full pool.
    pub fn select_candidates<'a>(
        &self,
        candidates: &'a [CandidateProfile],
        job: &JobProfile,
        index: Option<&dyn CandidateIndex>,
    ) -> Vec<&'a CandidateProfile> {
        let Some(index) = index else {
            return candidates.iter().collect();
        };

        match index.query_by_job_profile(job, self.config.top_k) {
            Ok(hits) if hits.is_empty() => {
                info!("candidate index returned no hits, evaluating full pool");
                candidates.iter().collect()
            }
            Ok(hits) => hits
                .iter()
                .filter_map(|hit| {
                    candidates
                        .iter()
                        .find(|candidate| candidate.id == hit.candidate_id)
                })
                .collect(),
            Err(err) => {
                warn!(error = %err, "candidate index failed, evaluating full pool");
                candidates.iter().collect()
            }
        }
    }

    /// Full run: analyze the posting, select, evaluate, rank, report.
    pub fn run(
        &self,
        description: &str,
        criteria: Option<&JobCriteria>,
        candidates: &[CandidateProfile],
        index: Option<&dyn CandidateIndex>,
    ) -> ScreeningOutcome {
        let job_profile = self.analyze_job(description, criteria);
        info!(
            title = %job_profile.title,
            required_skills = job_profile.required_skills.len(),
            candidates = candidates.len(),
            "screening run started"
        );

        let selected = self.select_candidates(candidates, &job_profile, index);
        let evaluations = self.evaluate_all(&selected, &job_profile);
        let report = self.engine.summarize(&evaluations);

        info!(
            evaluated = evaluations.len(),
            top = report.top_candidates.len(),
            "screening run finished"
        );

        ScreeningOutcome {
            job_profile,
            evaluations,
            report,
        }
    }
}
