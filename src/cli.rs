//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Kwalitee - line-weighted pylint rating for a Python code base
///
/// Runs pylint on every Python module under TARGET, weights each module's
/// rating by its lines of code, and fails when the weighted average is
/// below the minimum score.
///
/// Examples:
///   kwalitee
///   kwalitee src/shop
///   kwalitee src/shop/views.py --min-score 8
///   kwalitee . --report kwalitee.json --format json
///   kwalitee --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File or directory to rate
    ///
    /// Defaults to the current working directory.
    #[arg(value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .kwalitee.toml in the current directory,
    /// then in the target directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Minimum weighted average rating that passes
    #[arg(long, value_name = "SCORE", env = "KWALITEE_MIN_SCORE")]
    pub min_score: Option<f64>,

    /// Analyzer executable to run on each file
    #[arg(long, value_name = "CMD", env = "KWALITEE_ANALYZER")]
    pub analyzer: Option<String>,

    /// Directory names to skip entirely (comma-separated)
    ///
    /// Replaces the default set: migrations,evolutions,conf,configs
    #[arg(long, value_name = "DIRS", value_delimiter = ',')]
    pub exclude_dir: Option<Vec<String>>,

    /// Source file extension to rate
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Also write a report file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report file format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the files that would be rated and their options, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .kwalitee.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(score) = self.min_score {
            if !score.is_finite() {
                return Err("Minimum score must be a finite number".to_string());
            }
        }

        if let Some(ref analyzer) = self.analyzer {
            if analyzer.trim().is_empty() {
                return Err("Analyzer command cannot be empty".to_string());
            }
        }

        if let Some(ref extension) = self.extension {
            if extension.trim_start_matches('.').is_empty() {
                return Err("Extension cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the config file's `general.verbose`; `--quiet` beats it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}
