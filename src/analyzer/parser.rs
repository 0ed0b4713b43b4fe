//! Parser for pylint's text report.
//!
//! Consumes output line by line and stops at the final rating line.

use crate::error::KwaliteeError;
use crate::models::FileResult;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const VERDICT_MARKER: &str = "Your code has been rated at";

static MODULE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{13} Module").expect("valid module header regex"));
static DIAGNOSTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[CRWEF].{4}:.").expect("valid diagnostic regex"));
static LINES_OF_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|code      \|(\d+)").expect("valid line count regex"));
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d{1,2}.\d\d").expect("valid score regex"));

/// What was extracted from one analyzer run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOutput {
    /// Lines to pass through to the user, in order.
    pub echo: Vec<String>,
    /// Number of diagnostic findings seen.
    pub diagnostics: usize,
    /// Line count from the raw metrics table.
    pub lines_of_code: Option<u64>,
    /// Whether a rating line was reached.
    pub verdict_seen: bool,
    /// Rating from the verdict line.
    pub score: Option<f64>,
}

impl ParsedOutput {
    /// Turn the parse into a `FileResult`.
    ///
    /// A rating without a line count is malformed: the count cannot be
    /// guessed and must not be borrowed from another file.
    pub fn into_file_result(self, path: &Path) -> Result<FileResult, KwaliteeError> {
        match (self.score, self.lines_of_code) {
            (Some(_), None) => Err(KwaliteeError::MalformedAnalyzerOutput {
                path: path.to_path_buf(),
                reason: "rating reported before any line count".to_string(),
            }),
            (score, lines) => Ok(FileResult {
                score,
                lines_of_code: lines.unwrap_or(0),
            }),
        }
    }
}

/// Parse analyzer output, consuming lines up to and including the verdict.
///
/// Lines after the verdict are left in the iterator.
pub fn parse_output<I, S>(lines: I) -> ParsedOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedOutput::default();

    for line in lines {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);

        if MODULE_HEADER_RE.is_match(line) {
            parsed.echo.push(String::new());
            parsed.echo.push(line.to_string());
        } else if DIAGNOSTIC_RE.is_match(line) {
            parsed.diagnostics += 1;
            parsed.echo.push(line.to_string());
        } else if let Some(caps) = LINES_OF_CODE_RE.captures(line) {
            // The digit run cannot overflow in practice; treat it as absent if it does.
            parsed.lines_of_code = caps[1].parse().ok();
            if let Some(loc) = parsed.lines_of_code {
                parsed.echo.push(format!("Lines of code: {}", loc));
            }
        } else if line.contains(VERDICT_MARKER) {
            parsed.echo.push(line.to_string());
            parsed.verdict_seen = true;
            parsed.score = SCORE_RE
                .find(line)
                .and_then(|m| m.as_str().parse::<f64>().ok());
            break;
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
************* Module shop.models
C0111:  1: Missing docstring
W0611:  3: Unused import os
R0903: 10:Cart: Too few public methods (1/2)

Raw metrics
-----------

+----------+-------+------+---------+-----------+
|type      |number |%     |previous |difference |
+==========+=======+======+=========+===========+
|code      |42     |70.00 |42       |=          |
+----------+-------+------+---------+-----------+

Global evaluation
-----------------
Your code has been rated at 8.57/10 (previous run: 8.57/10)
trailing noise
";

    #[test]
    fn test_parse_full_report() {
        let parsed = parse_output(SAMPLE.lines());

        assert_eq!(parsed.lines_of_code, Some(42));
        assert_eq!(parsed.score, Some(8.57));
        assert!(parsed.verdict_seen);
        assert_eq!(parsed.diagnostics, 3);
        assert_eq!(
            parsed.echo,
            vec![
                "",
                "************* Module shop.models",
                "C0111:  1: Missing docstring",
                "W0611:  3: Unused import os",
                "R0903: 10:Cart: Too few public methods (1/2)",
                "Lines of code: 42",
                "Your code has been rated at 8.57/10 (previous run: 8.57/10)",
            ]
        );
    }

    #[test]
    fn test_parse_stops_at_verdict() {
        let mut lines = SAMPLE.lines();
        parse_output(lines.by_ref());
        assert_eq!(lines.next(), Some("trailing noise"));
    }

    #[test]
    fn test_parse_negative_score() {
        let out = "|code      |7     |\nYour code has been rated at -3.50/10\n";
        let parsed = parse_output(out.lines());
        assert_eq!(parsed.score, Some(-3.5));
    }

    #[test]
    fn test_no_verdict_means_no_score() {
        let out = "************* Module broken\nE0001:  1: invalid syntax\n|code      |12     |\n";
        let parsed = parse_output(out.lines());
        assert!(!parsed.verdict_seen);
        assert_eq!(parsed.score, None);

        let result = parsed.into_file_result(Path::new("broken.py")).unwrap();
        assert_eq!(result.score, None);
        assert_eq!(result.lines_of_code, 12);
    }

    #[test]
    fn test_verdict_without_number_is_unscored() {
        let out = "|code      |5     |\nYour code has been rated at nothing\n";
        let parsed = parse_output(out.lines());
        assert!(parsed.verdict_seen);
        assert_eq!(parsed.score, None);
    }

    #[test]
    fn test_verdict_without_line_count_is_malformed() {
        let out = "Your code has been rated at 9.00/10\n";
        let parsed = parse_output(out.lines());
        let err = parsed.into_file_result(Path::new("odd.py")).unwrap_err();
        assert!(matches!(err, KwaliteeError::MalformedAnalyzerOutput { .. }));
    }

    #[test]
    fn test_table_rows_are_not_diagnostics() {
        let out = "|comment   |3     |\nFoo bar\n";
        let parsed = parse_output(out.lines());
        assert_eq!(parsed.diagnostics, 0);
        assert!(parsed.echo.is_empty());
    }
}
