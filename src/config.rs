//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.kwalitee.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory
/// and in the target directory.
pub const CONFIG_FILE_NAME: &str = ".kwalitee.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Quality gate settings.
    #[serde(default)]
    pub gate: GateConfig,

    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Analyzer settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Quality gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Lowest weighted average that still passes.
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            minimum_score: default_minimum_score(),
        }
    }
}

fn default_minimum_score() -> f64 {
    6.75
}

/// File scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Source file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory names never descended into.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

fn default_extension() -> String {
    "py".to_string()
}

// These directories are largely machine generated and skew the rating.
fn default_exclude_dirs() -> Vec<String> {
    vec!["migrations", "evolutions", "conf", "configs"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// External analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Analyzer executable.
    #[serde(default = "default_command")]
    pub command: String,

    /// Arguments passed before the per-file options.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            extra_args: Vec::new(),
        }
    }
}

fn default_command() -> String {
    "pylint".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory, typically the rating target.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, and only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(min_score) = args.min_score {
            self.gate.minimum_score = min_score;
        }

        if let Some(ref command) = args.analyzer {
            self.analyzer.command = command.clone();
        }

        if let Some(ref extension) = args.extension {
            self.scanner.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(ref exclude_dirs) = args.exclude_dir {
            self.scanner.exclude_dirs = exclude_dirs.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gate.minimum_score, 6.75);
        assert_eq!(config.analyzer.command, "pylint");
        assert_eq!(config.scanner.extension, "py");
        assert_eq!(
            config.scanner.exclude_dirs,
            vec!["migrations", "evolutions", "conf", "configs"]
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[gate]
minimum_score = 8.0

[analyzer]
command = "/opt/venv/bin/pylint"
extra_args = ["--rcfile=.pylintrc"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.gate.minimum_score, 8.0);
        assert_eq!(config.analyzer.command, "/opt/venv/bin/pylint");
        assert_eq!(config.analyzer.extra_args, vec!["--rcfile=.pylintrc"]);
        // untouched sections keep their defaults
        assert_eq!(config.scanner.exclude_dirs.len(), 4);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[gate]"));
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[analyzer]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gate.minimum_score, 6.75);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[scanner]\nexclude_dirs = [\"vendor\"]\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.scanner.exclude_dirs, vec!["vendor"]);
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[gate\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
