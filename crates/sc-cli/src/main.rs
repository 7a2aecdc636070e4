use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};

use sc_common::error::StoreError;
use sc_common::llm::justifier_from_env;
use sc_common::logging::init_tracing_subscriber;
use sc_common::pipeline::{PipelineConfig, ScreeningPipeline};
use sc_common::profile::{build_candidate_profile, candidate_id_from_filename};
use sc_common::store::{CandidateRecord, RecordStore};
use sc_common::{CandidateProfile, JobCriteria};

#[derive(Debug, Parser)]
#[command(
    name = "sc-cli",
    about = "Screen a pool of candidate CVs against a job posting"
)]
struct Cli {
    /// Path to the job posting (.txt)
    #[arg(long, env = "SC_JOB_FILE")]
    job: PathBuf,

    /// Directory of candidate CVs (.txt, one file per candidate)
    #[arg(long, env = "SC_CANDIDATES_DIR", default_value = "candidates")]
    candidates_dir: PathBuf,

    /// Directory of cover letters, matched to CVs by file name
    #[arg(long, env = "SC_LETTERS_DIR")]
    letters_dir: Option<PathBuf>,

    /// Recruiter criteria overriding the posting analysis (JSON)
    #[arg(long, env = "SC_CRITERIA_FILE")]
    criteria: Option<PathBuf>,

    /// When set, parsed records are persisted under this directory
    #[arg(long, env = "SC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Evaluate candidates in parallel
    #[arg(long, env = "SC_PARALLEL", default_value_t = false)]
    parallel: bool,

    /// Write the full screening outcome as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum ScreenError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("")
}

fn read_cover_letter(letters_dir: Option<&Path>, cv_path: &Path) -> Option<String> {
    let dir = letters_dir?;
    let path = dir.join(cv_path.file_name()?);
    match fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(_) => None,
    }
}

/// Reads every `.txt` CV in the directory into a candidate profile.
/// Unreadable files are logged and skipped.
fn load_candidates(cli: &Cli) -> Result<Vec<CandidateProfile>, ScreenError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(&cli.candidates_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    paths.sort();

    let mut candidates = Vec::new();
    for path in paths {
        let raw_text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable cv");
                continue;
            }
        };
        let id = candidate_id_from_filename(file_stem(&path));
        let letter = read_cover_letter(cli.letters_dir.as_deref(), &path);
        candidates.push(build_candidate_profile(id, &raw_text, letter.as_deref()));
    }
    Ok(candidates)
}

fn load_criteria(path: Option<&Path>) -> Result<Option<JobCriteria>, ScreenError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

fn main() -> Result<(), ScreenError> {
    dotenv().ok();
    init_tracing_subscriber("sc-cli");

    let cli = Cli::parse();

    let job_text = fs::read_to_string(&cli.job)?;
    let criteria = load_criteria(cli.criteria.as_deref())?;
    let candidates = load_candidates(&cli)?;
    if candidates.is_empty() {
        warn!(dir = %cli.candidates_dir.display(), "no candidate cv found");
    }

    let mut config = PipelineConfig::from_env();
    if cli.parallel {
        config.parallel = true;
    }
    let pipeline = ScreeningPipeline::with_justifier(config, justifier_from_env());

    let mut outcome = pipeline.run(&job_text, criteria.as_ref(), &candidates, None);
    outcome.job_profile.id = candidate_id_from_filename(file_stem(&cli.job));

    if let Some(data_dir) = &cli.data_dir {
        let store = RecordStore::open(data_dir)?;
        store.save_job(&outcome.job_profile)?;
        for candidate in &candidates {
            let record = CandidateRecord::new(
                candidate.clone(),
                format!("{}.txt", candidate.id),
            );
            store.save_candidate(&record)?;
        }
        info!(dir = %data_dir.display(), "records persisted");
    }

    if let Some(output) = &cli.output {
        fs::write(output, serde_json::to_vec_pretty(&outcome)?)?;
        info!(path = %output.display(), "outcome written");
    }

    println!("{}", outcome.report.resume);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_file_parses_partial_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("criteria.json");
        fs::write(&path, r#"{"exp_min": 3, "required_skills": ["python"]}"#).unwrap();

        let criteria = load_criteria(Some(&path)).unwrap().unwrap();
        assert_eq!(criteria.exp_min, Some(3));
        assert_eq!(criteria.required_skills, Some(vec!["python".to_string()]));
        assert!(criteria.title.is_none());

        assert!(load_criteria(None).unwrap().is_none());
    }

    #[test]
    fn only_txt_files_are_ingested() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Jean Dupont.txt"), "Jean Dupont\n5 ans d'exp").unwrap();
        fs::write(tmp.path().join("notes.md"), "pas un cv").unwrap();

        let cli = Cli::parse_from([
            "sc-cli",
            "--job",
            "job.txt",
            "--candidates-dir",
            tmp.path().to_str().unwrap(),
        ]);

        let candidates = load_candidates(&cli).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "jean_dupont");
        assert_eq!(candidates[0].years_experience, 5);
    }

    #[test]
    fn cover_letters_are_matched_by_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let cvs = tmp.path().join("cvs");
        let letters = tmp.path().join("lettres");
        fs::create_dir_all(&cvs).unwrap();
        fs::create_dir_all(&letters).unwrap();
        fs::write(cvs.join("marie.txt"), "Marie Martin").unwrap();
        fs::write(letters.join("marie.txt"), "Je suis motivée.").unwrap();

        let cli = Cli::parse_from([
            "sc-cli",
            "--job",
            "job.txt",
            "--candidates-dir",
            cvs.to_str().unwrap(),
            "--letters-dir",
            letters.to_str().unwrap(),
        ]);

        let candidates = load_candidates(&cli).unwrap();
        assert_eq!(
            candidates[0].cover_letter.as_deref(),
            Some("Je suis motivée.")
        );
    }
}
