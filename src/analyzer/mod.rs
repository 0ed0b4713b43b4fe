//! Boundary to the external static analyzer.
//!
//! The aggregator only sees the `Analyzer` trait; `CommandAnalyzer` is the
//! implementation that actually spawns pylint.

pub mod parser;

pub use parser::{parse_output, ParsedOutput};

use crate::error::KwaliteeError;
use crate::models::FileConfiguration;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Something that can rate a single source file.
pub trait Analyzer {
    /// Analyze `path` with the given option overrides.
    fn analyze(&self, path: &Path, options: &FileConfiguration)
        -> Result<ParsedOutput, KwaliteeError>;

    /// Human-readable name, used in logs and report metadata.
    fn name(&self) -> &str;
}

/// Runs the analyzer as a child process and parses its stdout.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    /// Executable to run.
    command: String,
    /// Arguments passed before the per-file options.
    extra_args: Vec<String>,
}

impl CommandAnalyzer {
    pub fn new(command: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            extra_args,
        }
    }

    fn build_command(&self, path: &Path, options: &FileConfiguration) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.extra_args)
            .args(options.to_args())
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        cmd
    }
}

/// Parse a raw output stream, then drain the rest of it.
///
/// Lines are decoded lossily: pylint echoes source text, which need not be UTF-8.
fn parse_stream<R: BufRead>(reader: R) -> ParsedOutput {
    let mut lines = reader
        .split(b'\n')
        .map_while(Result::ok)
        .map(|raw| String::from_utf8_lossy(&raw).into_owned());
    let parsed = parse_output(lines.by_ref());
    // Drain whatever follows the verdict so the child never blocks on a full pipe.
    lines.for_each(drop);
    parsed
}

impl From<&crate::config::AnalyzerConfig> for CommandAnalyzer {
    fn from(config: &crate::config::AnalyzerConfig) -> Self {
        Self::new(config.command.clone(), config.extra_args.clone())
    }
}

impl Analyzer for CommandAnalyzer {
    fn analyze(
        &self,
        path: &Path,
        options: &FileConfiguration,
    ) -> Result<ParsedOutput, KwaliteeError> {
        let mut cmd = self.build_command(path, options);
        debug!("Running {:?}", cmd);

        let mut child = cmd.spawn().map_err(|source| KwaliteeError::AnalyzerLaunch {
            command: self.command.clone(),
            source,
        })?;

        let parsed = match child.stdout.take() {
            Some(stdout) => parse_stream(BufReader::new(stdout)),
            None => ParsedOutput::default(),
        };

        // Exit status carries pylint's message bitmask, not a failure signal.
        let status = child.wait()?;
        debug!("{} exited with {} for {}", self.command, status, path.display());
        if !parsed.verdict_seen {
            debug!("No rating line in output for {}", path.display());
        }

        Ok(parsed)
    }

    fn name(&self) -> &str {
        &self.command
    }
}
