//! Finished-run records and the sinks that keep them.

use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RunOutcome;

const SCORE_FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score table I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("score table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported score table version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub class_name: String,
    /// Elapsed minutes for time-scaled runs, floor depth otherwise.
    pub duration: f64,
    pub level: u32,
    pub currency: u32,
    pub outcome: RunOutcome,
}

impl RunRecord {
    pub fn score(&self) -> u64 {
        let duration_points = (self.duration.max(0.0) * 2.0).floor() as u64;
        u64::from(self.level) * 100 + u64::from(self.currency) + duration_points
    }
}

/// Receives each finished run exactly once.
pub trait ScoreSink {
    fn record_run(&mut self, record: &RunRecord) -> Result<(), ScoreError>;
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn record_run(&mut self, record: &RunRecord) -> Result<(), ScoreError> {
        (**self).record_run(record)
    }
}

impl<S: ScoreSink + ?Sized> ScoreSink for Box<S> {
    fn record_run(&mut self, record: &RunRecord) -> Result<(), ScoreError> {
        (**self).record_run(record)
    }
}

/// Highest score first; ties keep recording order.
pub fn rank_top(records: &[RunRecord], n: usize) -> Vec<RunRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by_key(|record| Reverse(record.score()));
    ranked.truncate(n);
    ranked
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreBoard {
    records: Vec<RunRecord>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn top(&self, n: usize) -> Vec<RunRecord> {
        rank_top(&self.records, n)
    }
}

impl ScoreSink for ScoreBoard {
    fn record_run(&mut self, record: &RunRecord) -> Result<(), ScoreError> {
        self.records.push(record.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreTable {
    format_version: u32,
    runs: Vec<RunRecord>,
}

/// JSON score table on disk, rewritten atomically on every recorded run.
#[derive(Clone, Debug)]
pub struct ScoreFile {
    path: PathBuf,
}

impl ScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty table.
    pub fn load(&self) -> Result<Vec<RunRecord>, ScoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let table: ScoreTable = serde_json::from_str(&content)?;
        if table.format_version != SCORE_FILE_VERSION {
            return Err(ScoreError::UnsupportedVersion(table.format_version));
        }
        Ok(table.runs)
    }

    pub fn top(&self, n: usize) -> Result<Vec<RunRecord>, ScoreError> {
        Ok(rank_top(&self.load()?, n))
    }

    fn write_atomic(&self, runs: Vec<RunRecord>) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let table = ScoreTable { format_version: SCORE_FILE_VERSION, runs };
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&table)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl ScoreSink for ScoreFile {
    fn record_run(&mut self, record: &RunRecord) -> Result<(), ScoreError> {
        let mut runs = self.load()?;
        runs.push(record.clone());
        self.write_atomic(runs)
    }
}
