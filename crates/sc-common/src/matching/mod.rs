//! Candidate/job matching: score formulas, assessments and final decision.

pub mod decision;
pub mod scoring;
pub mod weights;

pub use decision::{DecisionConfig, DecisionEngine, Evaluation, Report, ReportStatistics, Thresholds};
pub use scoring::{ProfileAssessment, SoftSkillsAssessment, TechnicalAssessment};
pub use weights::DecisionWeights;
