//! Result model — the product of an analysis run.

use guardrail_core::{MethodRef, PathCondition};
use serde::Serialize;

use crate::entry_points::EntryPoint;
use crate::graph::MethodCall;

use super::types::PairedCallObligation;

/// Outcome of the required-call check for one entry point.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub entry_point: EntryPoint,
    /// The matched target when found; the first declared target otherwise.
    pub required_call: MethodRef,
    pub found: bool,
    /// Witness path when found: ordered edges from entry to target.
    pub path: Option<Vec<MethodCall>>,
    /// The rule's human message, attached to violations.
    pub message: Option<String>,
}

/// A violated paired-call obligation, with the path that reached the
/// trigger as diagnostic evidence.
#[derive(Debug, Clone, Serialize)]
pub struct PairedCallViolation {
    pub entry_point: EntryPoint,
    pub obligation: PairedCallObligation,
    pub trigger_path: Vec<MethodCall>,
}

/// Per-rule aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    pub rule: String,
    pub condition: PathCondition,
    pub message: Option<String>,
    pub results: Vec<AnalysisResult>,
    pub paired_violations: Vec<PairedCallViolation>,
}

impl RuleResult {
    /// Required-call violations.
    pub fn violations(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter().filter(|r| !r.found)
    }

    pub fn has_violations(&self) -> bool {
        self.results.iter().any(|r| !r.found) || !self.paired_violations.is_empty()
    }
}
