//! Scanner module — deterministic PHP source discovery.
//!
//! Walks the analysis root (or its configured subpaths), filters to PHP
//! files, applies exclude globs, and returns files sorted by resolved
//! absolute path so that edge-insertion order is reproducible across runs.

mod ignores;
mod types;
mod walker;

pub use ignores::DEFAULT_IGNORES;
pub use types::{ScanResult, SourceFile};
pub use walker::Scanner;
