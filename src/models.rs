//! Data models for a rating run.
//!
//! This module contains the core data structures passed between the
//! selector, the analyzer boundary, the aggregator and the report writers.

use crate::error::KwaliteeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Ordered option overrides handed to the analyzer for one file.
///
/// Keys keep their insertion order; setting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfiguration {
    options: Vec<(String, String)>,
}

impl FileConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.options.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Render as `name=value` command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }
}

/// Score and size of one analyzed file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileResult {
    /// Final rating, absent when the analyzer gave none.
    pub score: Option<f64>,
    /// Lines of code the analyzer counted.
    pub lines_of_code: u64,
}

impl FileResult {
    /// The `(score, lines_of_code)` pair, or `UnscorableFile` when no score exists.
    pub fn scored(&self, path: &Path) -> Result<(f64, u64), KwaliteeError> {
        match self.score {
            Some(score) => Ok((score, self.lines_of_code)),
            None => Err(KwaliteeError::UnscorableFile {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Running totals over the files included so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateState {
    pub weighted_total: f64,
    pub total_lines: u64,
    pub file_count: usize,
}

impl AggregateState {
    /// Fold one scored file into the totals.
    pub fn include(&mut self, score: f64, lines_of_code: u64) {
        self.weighted_total += score * lines_of_code as f64;
        self.total_lines += lines_of_code;
        self.file_count += 1;
    }

    /// Weighted average over included lines, or `None` when no lines were included.
    pub fn average(&self) -> Option<f64> {
        if self.total_lines == 0 {
            None
        } else {
            Some(self.weighted_total / self.total_lines as f64)
        }
    }

    /// Close the run and evaluate the quality gate.
    pub fn finalize(
        self,
        candidates: usize,
        minimum_score: f64,
    ) -> Result<AggregateSummary, KwaliteeError> {
        let average = self
            .average()
            .ok_or(KwaliteeError::EmptyAggregate { candidates })?;

        Ok(AggregateSummary {
            file_count: self.file_count,
            total_lines: self.total_lines,
            weighted_total: self.weighted_total,
            average,
            minimum_score,
            passed: average >= minimum_score,
        })
    }
}

/// Final figures of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Files that contributed to the average.
    pub file_count: usize,
    /// Lines of code across included files.
    pub total_lines: u64,
    /// Sum of score × lines over included files.
    pub weighted_total: f64,
    /// Line-weighted average rating.
    pub average: f64,
    /// Gate threshold the average was compared against.
    pub minimum_score: f64,
    /// Whether the average met the threshold.
    pub passed: bool,
}

impl AggregateSummary {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// How a single candidate file fared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Scored { score: f64, lines_of_code: u64 },
    Unscorable,
    Malformed { reason: String },
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Scored { score, .. } => write!(f, "{:.2}", score),
            FileStatus::Unscorable => write!(f, "unscorable"),
            FileStatus::Malformed { .. } => write!(f, "malformed"),
        }
    }
}

/// Per-file record kept for report files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Diagnostic findings the analyzer reported.
    pub diagnostics: usize,
}

impl FileOutcome {
    pub fn is_included(&self) -> bool {
        matches!(self.status, FileStatus::Scored { .. })
    }
}

/// Outcome of a completed aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub files: Vec<FileOutcome>,
    pub summary: AggregateSummary,
}

impl RunReport {
    /// Files left out of the aggregate.
    pub fn excluded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| !f.is_included())
    }
}

/// Metadata about a written report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path that was rated.
    pub target: String,
    /// Date and time of the run.
    pub analysis_date: DateTime<Utc>,
    /// Analyzer executable used.
    pub analyzer: String,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// A report file: metadata plus the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub run: RunReport,
}
