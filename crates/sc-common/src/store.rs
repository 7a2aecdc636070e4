//! JSON record persistence for parsed candidates and job profiles.
//!
//! One file per record under `candidates/` and `jobs/` subdirectories.
//! Loading is lenient: unreadable or malformed files are logged and
//! skipped so a single bad record never blocks a run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::{CandidateProfile, JobProfile};

/// Parsed candidate plus ingestion metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CandidateRecord {
    pub profile: CandidateProfile,
    pub source_file: String,
    pub n_chars: usize,
    pub n_words: usize,
    pub parsed_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn new(profile: CandidateProfile, source_file: impl Into<String>) -> Self {
        let n_chars = profile.raw_text.chars().count();
        let n_words = profile.raw_text.split_whitespace().count();
        Self {
            profile,
            source_file: source_file.into(),
            n_chars,
            n_words,
            parsed_at: Utc::now(),
        }
    }
}

/// Directory-backed store of candidate and job records.
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Opens (creating if needed) the store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(dir.join("candidates"))?;
        fs::create_dir_all(dir.join("jobs"))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn candidate_path(&self, id: &str) -> PathBuf {
        self.dir.join("candidates").join(format!("{id}.json"))
    }

    fn job_path(&self, id: &str) -> PathBuf {
        self.dir.join("jobs").join(format!("{id}.json"))
    }

    pub fn save_candidate(&self, record: &CandidateRecord) -> Result<PathBuf, StoreError> {
        let path = self.candidate_path(&record.profile.id);
        fs::write(&path, serde_json::to_vec_pretty(record)?)?;
        debug!(path = %path.display(), "candidate record saved");
        Ok(path)
    }

    pub fn load_candidate(&self, id: &str) -> Result<CandidateRecord, StoreError> {
        let raw = fs::read(self.candidate_path(id))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Loads every readable candidate record, skipping broken files.
    pub fn list_candidates(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(self.dir.join("candidates"))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read(&path)
                .map_err(StoreError::from)
                .and_then(|raw| Ok(serde_json::from_slice::<CandidateRecord>(&raw)?))
            {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable candidate record");
                }
            }
        }
        records.sort_by(|a, b| a.profile.id.cmp(&b.profile.id));
        Ok(records)
    }

    pub fn save_job(&self, job: &JobProfile) -> Result<PathBuf, StoreError> {
        let path = self.job_path(&job.id);
        fs::write(&path, serde_json::to_vec_pretty(job)?)?;
        debug!(path = %path.display(), "job record saved");
        Ok(path)
    }

    pub fn load_job(&self, id: &str) -> Result<JobProfile, StoreError> {
        let raw = fs::read(self.job_path(id))?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
