//! Scanner types.

use std::path::PathBuf;

/// A source file admitted to analysis: absolute path plus UTF-8 contents.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Resolved absolute path.
    pub path: PathBuf,
    /// Path relative to the scan root, with forward-slash separators.
    pub relative: String,
    /// Full file contents.
    pub source: String,
}

/// Result of a scan operation.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Admitted files, sorted by absolute path.
    pub files: Vec<SourceFile>,
    /// Files skipped (unreadable, non-UTF-8, oversized).
    pub skipped: usize,
}
