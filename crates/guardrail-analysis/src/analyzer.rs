//! Analyzer — the batch pipeline.
//!
//! Leaves first: scan -> parse -> Pass 1 -> Pass 2 -> Pass 3 -> evaluate.
//! The program model and call graph are mutated only during construction;
//! evaluation reads a frozen graph. Given the same input set, the engine
//! produces identical graphs and identical witness paths.

use std::path::Path;
use std::time::Instant;

use guardrail_core::{AnalysisError, CancelToken, ScanConfig};
use serde::Serialize;
use tracing::{debug, info};

use crate::graph::CallGraph;
use crate::parser;
use crate::passes::{CallAnalyzer, DefinitionCollector, InterfaceLinker, ProgramModel};
use crate::rules::{Rule, RuleEvaluator, RuleResult};
use crate::scanner::{Scanner, SourceFile};

/// Run statistics, reported alongside the results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisStats {
    pub files_analyzed: usize,
    /// Unreadable, oversized, non-UTF-8, or unparseable files.
    pub files_skipped: usize,
    pub classes: usize,
    pub methods: usize,
    pub edges: usize,
    /// Call sites whose receiver never resolved; recorded but untraversable.
    pub unresolved_calls: usize,
    pub entry_points: usize,
    pub duration_ms: u64,
}

/// The product of a run: per-rule results plus statistics.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub results: Vec<RuleResult>,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn has_violations(&self) -> bool {
        self.results.iter().any(RuleResult::has_violations)
    }

    pub fn violation_count(&self) -> usize {
        self.results
            .iter()
            .map(|r| r.violations().count() + r.paired_violations.len())
            .sum()
    }
}

/// The analysis pipeline. Holds no state between runs; every run is fresh.
pub struct Analyzer {
    scan_config: ScanConfig,
    cancel: CancelToken,
}

impl Analyzer {
    pub fn new(scan_config: ScanConfig) -> Self {
        Self {
            scan_config,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token; checked between files and between entry
    /// points.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Scan `root` and analyze everything found.
    pub fn analyze_path(&self, root: &Path, rules: &[Rule]) -> Result<AnalysisReport, AnalysisError> {
        let scan = Scanner::new(root, self.scan_config.clone()).scan()?;
        info!(files = scan.files.len(), skipped = scan.skipped, "scan complete");
        self.analyze_files(scan.files, scan.skipped, rules)
    }

    /// Analyze an explicit file set (already ordered by the caller).
    pub fn analyze_files(
        &self,
        files: Vec<SourceFile>,
        scan_skipped: usize,
        rules: &[Rule],
    ) -> Result<AnalysisReport, AnalysisError> {
        let start = Instant::now();

        let (units, parse_skipped) = parser::parse_all(files);
        debug!(units = units.len(), skipped = parse_skipped, "parse complete");

        // Pass 1 runs to completion before Pass 2 looks at any call site:
        // receiver resolution depends on declarations that may appear later
        // in file order.
        let mut model = ProgramModel::default();
        for unit in &units {
            self.check_cancel()?;
            DefinitionCollector::collect(&mut model, unit);
        }

        let mut graph = CallGraph::new();
        for unit in &units {
            self.check_cancel()?;
            CallAnalyzer::analyze(&model, &mut graph, unit);
        }

        InterfaceLinker::link(&model.hierarchy, &mut graph);

        for call in graph.unresolved() {
            debug!(
                caller = %call.caller_id(),
                receiver = call.receiver.as_deref().unwrap_or("?"),
                method = %call.callee_method,
                line = call.line,
                "call went unresolved"
            );
        }

        // Frozen from here on.
        let evaluator = RuleEvaluator::new(&graph);
        let mut results = Vec::new();
        let mut entry_points = 0;
        for rule in rules {
            let entries = rule.selector.collect(&model.hierarchy);
            entry_points += entries.len();
            results.push(evaluator.evaluate(rule, &entries, &self.cancel)?);
        }

        let stats = AnalysisStats {
            files_analyzed: units.len(),
            files_skipped: scan_skipped + parse_skipped,
            classes: model.hierarchy.class_count(),
            methods: model.hierarchy.method_count(),
            edges: graph.edge_count(),
            unresolved_calls: graph.unresolved_count(),
            entry_points,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            classes = stats.classes,
            methods = stats.methods,
            edges = stats.edges,
            "analysis complete"
        );

        Ok(AnalysisReport { results, stats })
    }

    fn check_cancel(&self) -> Result<(), AnalysisError> {
        if self.cancel.is_cancelled() {
            Err(AnalysisError::Cancelled)
        } else {
            Ok(())
        }
    }
}
