//! Kwalitee - line-weighted pylint rating for Python code bases
//!
//! Runs pylint once per module, weights each module's rating by its lines
//! of code, and gates on the weighted average.
//!
//! Exit codes:
//!   0 - Weighted average at or above the minimum score
//!   1 - Average below the minimum, invalid target, nothing rated, or runtime error

mod analysis;
mod analyzer;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;
mod selector;

use analysis::Aggregator;
use analyzer::{Analyzer, CommandAnalyzer};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let outcome = run(args);
    std::process::exit(exit_code(&outcome));
}

/// Map a run outcome to the process exit code, reporting any error on stderr.
fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// The target to rate, defaulting to the current working directory.
fn resolve_target<W: Write>(target: Option<&Path>, out: &mut W) -> Result<PathBuf> {
    match target {
        Some(target) => Ok(target.to_path_buf()),
        None => {
            writeln!(
                out,
                "no directory specified, defaulting to current working directory"
            )?;
            std::env::current_dir().context("Failed to read current working directory")
        }
    }
}

/// Handle --init-config: generate a default .kwalitee.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", config::CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging on stderr; stdout carries the rating output.
///
/// `RUST_LOG`, when set, takes precedence over the verbosity flags.
fn init_logging(level: tracing::Level) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), level);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Filter from a `RUST_LOG` spec, falling back to the flag-derived level.
fn log_filter(rust_log: Option<&str>, level: tracing::Level) -> EnvFilter {
    rust_log
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()))
}

/// Rate the target. Returns the exit code for the quality gate.
fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let target = resolve_target(args.target.as_deref(), &mut std::io::stdout())?;

    let mut config = load_config(&args, &target)?;
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));
    info!("kwalitee v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    let analyzer = CommandAnalyzer::from(&config.analyzer);
    let aggregator = Aggregator::new(
        analyzer,
        scanner::ScanConfig::from(&config.scanner),
        config.gate.minimum_score,
    )
    .with_progress(make_progress_bar(args.quiet));

    if args.dry_run {
        return handle_dry_run(&aggregator, &target);
    }

    let mut stdout = std::io::stdout().lock();
    let run_report = aggregator.run(&target, &mut stdout)?;

    for excluded in run_report.excluded() {
        debug!("Not counted: {}", excluded.path.display());
    }

    let summary = run_report.summary.clone();
    if !summary.passed {
        warn!(
            "Weighted average {:.2} is below the minimum of {:.2}",
            summary.average, summary.minimum_score
        );
    }

    if let Some(ref report_path) = args.report {
        let report = Report {
            metadata: ReportMetadata {
                target: target.display().to_string(),
                analysis_date: Utc::now(),
                analyzer: aggregator.analyzer_name().to_string(),
                duration_seconds: start_time.elapsed().as_secs_f64(),
            },
            run: run_report,
        };
        report::write_report(&report, report_path, args.format)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        info!("Report saved to {}", report_path.display());
    }

    Ok(summary.exit_code())
}

/// Handle --dry-run: list candidates and their options, analyze nothing.
fn handle_dry_run<A: Analyzer>(aggregator: &Aggregator<A>, target: &Path) -> Result<i32> {
    let files = aggregator.candidates(target)?;

    if files.is_empty() {
        println!("No matching source files found.");
        return Ok(0);
    }

    println!("Found {} files that would be rated:\n", files.len());
    for file in &files {
        let options = aggregator.selector().select(file);
        println!("  {}", file.display());
        if options.is_empty() {
            continue;
        }
        for arg in options.to_args() {
            println!("      {}", arg);
        }
    }

    Ok(0)
}

/// Progress bar on stderr; hidden in quiet mode.
fn make_progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {wide_msg}")
    {
        pb.set_style(style);
    }
    pb
}

/// Load configuration from file or use defaults.
///
/// Explicit `--config` first, then the working directory, then the target
/// directory.
fn load_config(args: &Args, target: &Path) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    if let Some(config) = Config::load_default()? {
        return Ok(config);
    }

    if target.is_dir() {
        if let Some(config) = Config::load_from_dir(target)? {
            return Ok(config);
        }
    }

    Ok(Config::default())
}
