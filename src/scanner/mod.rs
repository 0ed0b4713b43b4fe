//! File scanner for discovering candidate source files.
//!
//! This module resolves the rating target into the list of files to
//! analyze, pruning directories that mostly hold generated code.

use crate::error::KwaliteeError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Source file extension, without the dot.
    pub extension: String,
    /// Directory names that are never descended into.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            exclude_dirs: vec!["migrations", "evolutions", "conf", "configs"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
        }
    }
}

/// File scanner for discovering source files.
pub struct FileScanner {
    config: ScanConfig,
    target: PathBuf,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(target: PathBuf, config: ScanConfig) -> Self {
        Self { config, target }
    }

    /// Resolve the target into candidate files.
    ///
    /// A directory is walked recursively; a single file is its own only
    /// candidate when it carries the source extension. Anything else is
    /// an `InvalidTarget`.
    pub fn scan(&self) -> Result<Vec<PathBuf>, KwaliteeError> {
        if self.target.is_dir() {
            Ok(self.walk_dir())
        } else if self.target.is_file() && self.has_extension(&self.target) {
            Ok(vec![self.target.clone()])
        } else {
            Err(KwaliteeError::InvalidTarget {
                path: self.target.clone(),
                extension: self.config.extension.clone(),
            })
        }
    }

    /// Check if a path carries the source extension.
    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.config.extension)
    }

    /// Check if a directory entry should be pruned with its whole subtree.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        // The root is never pruned, even if it shares a name with an excluded dir.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config.exclude_dirs.iter().any(|pattern| name == pattern.as_str())
    }

    fn walk_dir(&self) -> Vec<PathBuf> {
        let walker = WalkDir::new(&self.target)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let excluded = self.is_excluded(e);
                if excluded {
                    debug!("Pruning {}", e.path().display());
                }
                !excluded
            });

        let mut files = Vec::new();
        for item in walker {
            match item {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.has_extension(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!("Skipping unreadable entry: {}", e),
            }
        }

        debug!("Found {} candidate files under {}", files.len(), self.target.display());
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x = 1\n").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_prunes_excluded_dirs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app/models.py");
        touch(dir.path(), "app/migrations/0001_initial.py");
        touch(dir.path(), "app/evolutions/e.py");
        touch(dir.path(), "conf/settings.py");
        touch(dir.path(), "configs/deep/nested/x.py");
        touch(dir.path(), "app/notes.txt");

        let scanner = FileScanner::new(dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        assert_eq!(relative(dir.path(), &files), vec!["app/models.py"]);
    }

    #[test]
    fn test_scan_matches_dir_names_exactly() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "migrations_old/a.py");
        touch(dir.path(), "myconf/b.py");

        let scanner = FileScanner::new(dir.path().to_path_buf(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        assert_eq!(
            relative(dir.path(), &files),
            vec!["migrations_old/a.py", "myconf/b.py"]
        );
    }

    #[test]
    fn test_scan_root_named_like_excluded_dir() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "conf/a.py");

        let root = dir.path().join("conf");
        let scanner = FileScanner::new(root.clone(), ScanConfig::default());
        let files = scanner.scan().unwrap();

        assert_eq!(relative(&root, &files), vec!["a.py"]);
    }

    #[test]
    fn test_scan_single_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "module.py");
        let path = dir.path().join("module.py");

        let scanner = FileScanner::new(path.clone(), ScanConfig::default());
        assert_eq!(scanner.scan().unwrap(), vec![path]);
    }

    #[test]
    fn test_scan_invalid_targets() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "readme.txt");

        for target in [dir.path().join("readme.txt"), dir.path().join("missing")] {
            let scanner = FileScanner::new(target, ScanConfig::default());
            let err = scanner.scan().unwrap_err();
            assert!(matches!(err, KwaliteeError::InvalidTarget { .. }));
        }
    }
}
