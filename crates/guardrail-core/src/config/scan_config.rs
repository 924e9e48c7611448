//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Configuration for source discovery under the analysis root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directories (relative to the analysis root) to scan. Empty means the
    /// whole root.
    pub paths: Vec<String>,
    /// Glob patterns to exclude, matched against root-relative paths
    /// (e.g. "vendor/**", "**/*.blade.php").
    pub excludes: Vec<String>,
    /// Maximum file size in bytes. Default: 1MB.
    pub max_file_size: Option<u64>,
}

impl ScanConfig {
    /// Returns the effective max file size, defaulting to 1MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }
}
