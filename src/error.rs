//! Error types for a rating run.
//!
//! Fatal variants abort the run before a report exists; the per-file
//! variants are recovered by leaving that file out of the aggregate.

use std::path::PathBuf;

/// Everything that can go wrong while rating a target.
#[derive(Debug, thiserror::Error)]
pub enum KwaliteeError {
    /// Target is neither a directory nor an existing source file.
    #[error("{} does not exist or is not a .{extension} source", path.display())]
    InvalidTarget { path: PathBuf, extension: String },

    /// No file produced a usable score, so there is nothing to divide by.
    #[error("no analyzed lines of code across {candidates} candidate file(s); cannot compute a weighted average")]
    EmptyAggregate { candidates: usize },

    /// The analyzer never emitted a final rating for this file.
    #[error("no rating reported for {}", path.display())]
    UnscorableFile { path: PathBuf },

    /// The analyzer output had a rating but was missing something it depends on.
    #[error("malformed analyzer output for {}: {reason}", path.display())]
    MalformedAnalyzerOutput { path: PathBuf, reason: String },

    /// The analyzer executable could not be started.
    #[error("failed to run analyzer `{command}`: {source}")]
    AnalyzerLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl KwaliteeError {
    /// Whether the run can continue after this error by skipping the file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            KwaliteeError::UnscorableFile { .. } | KwaliteeError::MalformedAnalyzerOutput { .. }
        )
    }
}
