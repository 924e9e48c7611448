//! # guardrail-core
//!
//! Foundation crate for the Guardrail reachability analyzer.
//! Defines shared types, errors, configuration, and cancellation.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod errors;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancelToken;
pub use config::{
    EntryPointsConfig, GuardrailConfig, PairedConfig, PathCondition, RuleConfig, ScanConfig,
};
pub use errors::{AnalysisError, ConfigError};
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::method_ref::MethodRef;
