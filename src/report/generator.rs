//! Report generation.
//!
//! The console summary printed at the end of every successful run, plus
//! the optional Markdown and JSON report files.

use crate::models::{AggregateSummary, FileOutcome, FileStatus, Report, ReportMetadata};
use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

const SEPARATOR_WIDTH: usize = 100;

/// Write the closing summary lines of a run.
pub fn write_summary<W: Write>(out: &mut W, summary: &AggregateSummary) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    writeln!(
        out,
        "{} modules found containing {} lines of code",
        summary.file_count, summary.total_lines
    )?;
    writeln!(out, "WEIGHTED AVERAGE RATING = {:.2}", summary.average)?;
    Ok(())
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Kwalitee Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.run.summary));
    output.push_str(&generate_files_section(&report.run.files));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Target:** `{}`\n", metadata.target));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Analyzer:** `{}`\n", metadata.analyzer));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &AggregateSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Modules | Lines of Code | Weighted Average | Minimum | Result |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | **{:.2}** | {:.2} | {} |\n\n",
        summary.file_count,
        summary.total_lines,
        summary.average,
        summary.minimum_score,
        if summary.passed { "PASS" } else { "FAIL" }
    ));

    section
}

/// Generate the per-file section.
fn generate_files_section(files: &[FileOutcome]) -> String {
    let mut section = String::new();

    section.push_str("## Files\n\n");

    if files.is_empty() {
        section.push_str("No files were analyzed.\n\n");
        return section;
    }

    section.push_str("| File | Rating | Lines of Code | Diagnostics |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for file in files {
        let lines = match file.status {
            FileStatus::Scored { lines_of_code, .. } => lines_of_code.to_string(),
            _ => "-".to_string(),
        };
        section.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            file.path.display(),
            file.status,
            lines,
            file.diagnostics
        ));
    }
    section.push('\n');

    let excluded: Vec<_> = files.iter().filter(|f| !f.is_included()).collect();
    if !excluded.is_empty() {
        section.push_str("### Excluded From Average\n\n");
        for file in excluded {
            let why = match &file.status {
                FileStatus::Malformed { reason } => reason.as_str(),
                _ => "no rating reported",
            };
            section.push_str(&format!("- `{}`: {}\n", file.path.display(), why));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by kwalitee*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a report to a file in the given format.
pub fn write_report(report: &Report, path: &Path, format: crate::cli::OutputFormat) -> Result<()> {
    let content = match format {
        crate::cli::OutputFormat::Markdown => generate_markdown_report(report),
        crate::cli::OutputFormat::Json => generate_json_report(report)?,
    };

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunReport;
    use chrono::Utc;
    use std::path::PathBuf;

    fn create_test_report() -> Report {
        let metadata = ReportMetadata {
            target: "shop".to_string(),
            analysis_date: Utc::now(),
            analyzer: "pylint".to_string(),
            duration_seconds: 3.0,
        };

        Report {
            metadata,
            run: RunReport {
                files: vec![
                    FileOutcome {
                        path: PathBuf::from("shop/models.py"),
                        status: FileStatus::Scored {
                            score: 9.0,
                            lines_of_code: 50,
                        },
                        diagnostics: 1,
                    },
                    FileOutcome {
                        path: PathBuf::from("shop/broken.py"),
                        status: FileStatus::Unscorable,
                        diagnostics: 1,
                    },
                ],
                summary: AggregateSummary {
                    file_count: 1,
                    total_lines: 50,
                    weighted_total: 450.0,
                    average: 9.0,
                    minimum_score: 6.75,
                    passed: true,
                },
            },
        }
    }

    #[test]
    fn test_write_summary_lines() {
        let report = create_test_report();
        let mut out = Vec::new();
        write_summary(&mut out, &report.run.summary).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(100));
        assert_eq!(lines[1], "1 modules found containing 50 lines of code");
        assert_eq!(lines[2], "WEIGHTED AVERAGE RATING = 9.00");
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Kwalitee Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| 1 | 50 | **9.00** | 6.75 | PASS |"));
        assert!(markdown.contains("| `shop/models.py` | 9.00 | 50 | 1 |"));
        assert!(markdown.contains("### Excluded From Average"));
        assert!(markdown.contains("- `shop/broken.py`: no rating reported"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["analyzer"], "pylint");
        assert_eq!(value["summary"]["total_lines"], 50);
        assert_eq!(value["files"][1]["status"], "unscorable");
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.md");
        write_report(&create_test_report(), &path, crate::cli::OutputFormat::Markdown).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Kwalitee Report"));
    }
}
