//! Error types shared across the crate.

use thiserror::Error;

/// Invalid engine configuration, rejected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("decision weights must sum to 1.0, got {0}")]
    WeightsNotNormalized(f64),
}

/// Persistence failures around candidate/job records on disk.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of an optional candidate pre-selection index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("candidate index unavailable: {0}")]
    Unavailable(String),
}
