//! Recursive file walker with exclude globs.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use guardrail_core::{AnalysisError, ScanConfig};
use tracing::debug;

use super::ignores::is_default_ignored;
use super::types::{ScanResult, SourceFile};

const PHP_EXTENSIONS: &[&str] = &["php", "phtml", "php3", "php4", "php5", "phps"];

/// File scanner for a single analysis root.
pub struct Scanner {
    root: PathBuf,
    config: ScanConfig,
    excludes: GlobSet,
}

impl Scanner {
    /// Create a scanner. Invalid exclude patterns are dropped with a warning
    /// rather than failing the run.
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.excludes {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid exclude pattern");
                }
            }
        }
        let excludes = builder
            .build()
            .unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap());

        Self {
            root: root.into(),
            config,
            excludes,
        }
    }

    /// Scan the filesystem. Files are returned sorted by resolved absolute
    /// path; unreadable or non-UTF-8 files are skipped.
    pub fn scan(&self) -> Result<ScanResult, AnalysisError> {
        let root = self
            .root
            .canonicalize()
            .map_err(|e| AnalysisError::RootUnreadable {
                path: self.root.display().to_string(),
                source: e,
            })?;

        let mut candidates = Vec::new();
        if self.config.paths.is_empty() {
            self.walk_dir(&root, &root, &mut candidates);
        } else {
            for sub in &self.config.paths {
                let dir = root.join(sub);
                if dir.is_dir() {
                    self.walk_dir(&root, &dir, &mut candidates);
                } else {
                    debug!(path = %dir.display(), "scan path missing, skipping");
                }
            }
        }

        candidates.sort();
        candidates.dedup();

        let mut result = ScanResult::default();
        for path in candidates {
            match self.read_file(&root, &path) {
                Some(file) => result.files.push(file),
                None => result.skipped += 1,
            }
        }
        Ok(result)
    }

    fn walk_dir(&self, root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "unreadable directory, skipping");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let relative = relative_path(root, &path);

            if path.is_dir() {
                let name = entry.file_name();
                if is_default_ignored(&name.to_string_lossy()) {
                    continue;
                }
                if !self.excludes.is_match(&relative) {
                    self.walk_dir(root, &path, out);
                }
            } else if path.is_file()
                && is_php_file(&path)
                && !self.excludes.is_match(&relative)
            {
                // Resolve symlinks so the sort key is the real path.
                out.push(path.canonicalize().unwrap_or(path));
            }
        }
    }

    fn read_file(&self, root: &Path, path: &Path) -> Option<SourceFile> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "unreadable file, skipping");
                return None;
            }
        };
        if metadata.len() > self.config.effective_max_file_size() {
            debug!(path = %path.display(), size = metadata.len(), "oversized file, skipping");
            return None;
        }

        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "read failed, skipping");
                return None;
            }
        };
        let source = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                debug!(path = %path.display(), "non-UTF-8 file, skipping");
                return None;
            }
        };

        Some(SourceFile {
            relative: relative_path(root, path),
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_php_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PHP_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
