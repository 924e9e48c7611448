//! # guardrail-analysis
//!
//! The Guardrail analysis engine. Builds a program model and call graph
//! from PHP source in three passes, then evaluates reachability rules
//! against designated entry points:
//!
//! - Scanner: deterministic PHP file discovery with exclude patterns
//! - Parser: tree-sitter frontend; unparseable files are skipped
//! - Pass 1: class hierarchy + property/return type collection
//! - Pass 2: receiver type inference and call-edge emission
//! - Pass 3: interface-to-implementor fan-out edges
//! - Call graph: DFS reachability with witness paths
//! - Rules: required-call and paired-call obligation evaluation

pub mod analyzer;
pub mod entry_points;
pub mod graph;
pub mod hierarchy;
pub mod names;
pub mod parser;
pub mod passes;
pub mod registry;
pub mod rules;
pub mod scanner;

// Re-exports for convenience
pub use analyzer::{AnalysisReport, AnalysisStats, Analyzer};
pub use entry_points::{EntryPoint, EntryPointSelector};
pub use graph::{CallGraph, MethodCall};
pub use hierarchy::ClassHierarchy;
pub use parser::{PhpParser, SourceUnit};
pub use registry::TypeRegistry;
pub use rules::{
    AnalysisResult, PairedCallObligation, PairedCallViolation, Rule, RuleEvaluator, RuleResult,
};
pub use scanner::{Scanner, SourceFile};
