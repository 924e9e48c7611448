//! Error types for the Guardrail workspace.
//!
//! Two categories exist at the type level:
//!
//! - [`ConfigError`] — construction-time configuration failures. Fatal to
//!   the run before any analysis starts.
//! - [`AnalysisError`] — failures of the run itself (root I/O, cancellation).
//!
//! Per-file parse and read failures are deliberately NOT errors: real
//! projects contain generated and vendor code that may not parse, so those
//! files are skipped and logged at debug level.

mod analysis_error;
mod config_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
