//! Weighted rating aggregation.
//!
//! Walks the target, rates every candidate file through an `Analyzer`,
//! and folds the ratings into one average weighted by lines of code.
//! Files without a usable rating are left out of both sides of the
//! division.

use crate::analyzer::Analyzer;
use crate::error::KwaliteeError;
use crate::models::{AggregateState, FileOutcome, FileStatus, RunReport};
use crate::report::write_summary;
use crate::scanner::{FileScanner, ScanConfig};
use crate::selector::ConfigSelector;
use indicatif::ProgressBar;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Drives one rating run.
pub struct Aggregator<A: Analyzer> {
    analyzer: A,
    selector: ConfigSelector,
    scan_config: ScanConfig,
    minimum_score: f64,
    progress: ProgressBar,
}

impl<A: Analyzer> Aggregator<A> {
    pub fn new(analyzer: A, scan_config: ScanConfig, minimum_score: f64) -> Self {
        Self {
            analyzer,
            selector: ConfigSelector::new(),
            scan_config,
            minimum_score,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-file progress on this bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn selector(&self) -> &ConfigSelector {
        &self.selector
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    /// Files that a run on `target` would analyze.
    pub fn candidates(&self, target: &Path) -> Result<Vec<PathBuf>, KwaliteeError> {
        FileScanner::new(target.to_path_buf(), self.scan_config.clone()).scan()
    }

    /// Rate `target`, echoing analyzer output and the final summary to `out`.
    ///
    /// Nothing is written to `out` for an invalid target, and the summary is
    /// not written when no file yielded a usable rating.
    pub fn run<W: Write>(&self, target: &Path, out: &mut W) -> Result<RunReport, KwaliteeError> {
        let candidates = self.candidates(target)?;
        info!("Rating {} candidate files under {}", candidates.len(), target.display());

        self.progress.set_length(candidates.len() as u64);

        let mut state = AggregateState::default();
        let mut files = Vec::with_capacity(candidates.len());

        for path in &candidates {
            self.progress.set_message(path.display().to_string());
            files.push(self.analyze_file(path, &mut state, out)?);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        let summary = state.finalize(candidates.len(), self.minimum_score)?;
        info!(
            "Weighted average {:.2} over {} files, minimum {:.2}",
            summary.average, summary.file_count, summary.minimum_score
        );

        self.progress.suspend(|| write_summary(out, &summary))?;

        Ok(RunReport { files, summary })
    }

    fn analyze_file<W: Write>(
        &self,
        path: &Path,
        state: &mut AggregateState,
        out: &mut W,
    ) -> Result<FileOutcome, KwaliteeError> {
        let options = self.selector.select(path);
        debug!("Analyzing {} with {} options", path.display(), options.len());

        let parsed = self.analyzer.analyze(path, &options)?;
        let diagnostics = parsed.diagnostics;

        self.progress.suspend(|| -> io::Result<()> {
            for line in &parsed.echo {
                writeln!(out, "{}", line)?;
            }
            Ok(())
        })?;

        let status = match parsed.into_file_result(path).and_then(|r| r.scored(path)) {
            Ok((score, lines_of_code)) => {
                state.include(score, lines_of_code);
                FileStatus::Scored {
                    score,
                    lines_of_code,
                }
            }
            Err(e) if !e.is_per_file() => return Err(e),
            Err(KwaliteeError::MalformedAnalyzerOutput { reason, .. }) => {
                warn!("Excluding {}: {}", path.display(), reason);
                FileStatus::Malformed { reason }
            }
            Err(e) => {
                debug!("Excluding: {}", e);
                FileStatus::Unscorable
            }
        };

        Ok(FileOutcome {
            path: path.to_path_buf(),
            status,
            diagnostics,
        })
    }
}
