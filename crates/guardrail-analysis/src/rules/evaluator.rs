//! Rule evaluator — reachability checks over the frozen call graph.

use guardrail_core::{AnalysisError, CancelToken};

use crate::entry_points::EntryPoint;
use crate::graph::CallGraph;

use super::results::{AnalysisResult, PairedCallViolation, RuleResult};
use super::types::Rule;

/// Evaluates rules against an immutable call graph.
pub struct RuleEvaluator<'g> {
    graph: &'g CallGraph,
}

impl<'g> RuleEvaluator<'g> {
    pub fn new(graph: &'g CallGraph) -> Self {
        Self { graph }
    }

    /// Evaluate one rule over its entry points. Zero entry points is a
    /// degenerate pass: zero results, zero violations.
    pub fn evaluate(
        &self,
        rule: &Rule,
        entries: &[EntryPoint],
        cancel: &CancelToken,
    ) -> Result<RuleResult, AnalysisError> {
        let mut results = Vec::new();
        let mut paired_violations = Vec::new();

        for entry in entries {
            if cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled);
            }
            let entry_id = entry.id();

            if !rule.required.is_empty() {
                results.push(self.check_required(rule, entry, &entry_id));
            }

            for obligation in &rule.paired {
                // An unreachable trigger satisfies the obligation vacuously.
                let Some(trigger_path) = self.graph.find_path(&entry_id, &obligation.trigger.id())
                else {
                    continue;
                };
                let satisfied = obligation
                    .completions
                    .iter()
                    .any(|completion| self.graph.has_path(&entry_id, &completion.id()));
                if !satisfied {
                    paired_violations.push(PairedCallViolation {
                        entry_point: entry.clone(),
                        obligation: obligation.clone(),
                        trigger_path,
                    });
                }
            }
        }

        Ok(RuleResult {
            rule: rule.name.clone(),
            condition: rule.condition,
            message: rule.message.clone(),
            results,
            paired_violations,
        })
    }

    /// Any-of over the declared targets; the first hit carries its witness.
    fn check_required(&self, rule: &Rule, entry: &EntryPoint, entry_id: &str) -> AnalysisResult {
        for target in &rule.required {
            if let Some(path) = self.graph.find_path(entry_id, &target.id()) {
                return AnalysisResult {
                    entry_point: entry.clone(),
                    required_call: target.clone(),
                    found: true,
                    path: Some(path),
                    message: None,
                };
            }
        }
        AnalysisResult {
            entry_point: entry.clone(),
            required_call: rule.required[0].clone(),
            found: false,
            path: None,
            message: rule.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MethodCall;
    use guardrail_core::{EntryPointsConfig, MethodRef, PairedConfig, RuleConfig};

    fn edge(caller: (&str, &str), callee: (&str, &str)) -> MethodCall {
        MethodCall {
            caller_class: caller.0.to_string(),
            caller_method: caller.1.to_string(),
            callee_class: Some(callee.0.to_string()),
            callee_method: callee.1.to_string(),
            line: 1,
            is_static: false,
            receiver: None,
        }
    }

    fn rule(required: &[&str], paired: &[(&str, &[&str])]) -> Rule {
        Rule::from_config(&RuleConfig {
            name: "rule".to_string(),
            message: Some("must comply".to_string()),
            condition: Default::default(),
            entry_points: EntryPointsConfig {
                classes: vec!["App\\*".to_string()],
                ..Default::default()
            },
            required: required.iter().map(|r| MethodRef::parse(r).unwrap()).collect(),
            paired: paired
                .iter()
                .map(|(trigger, completions)| PairedConfig {
                    trigger: MethodRef::parse(trigger).unwrap(),
                    completions: completions
                        .iter()
                        .map(|c| MethodRef::parse(c).unwrap())
                        .collect(),
                    message: None,
                })
                .collect(),
        })
        .unwrap()
    }

    #[test]
    fn first_required_target_hit_wins() {
        let mut graph = CallGraph::new();
        graph.add(edge(("App\\S", "exec"), ("App\\B", "second")));

        let rule = rule(&["App\\B::first", "App\\B::second"], &[]);
        let entries = vec![EntryPoint::new("App\\S", "exec")];
        let result = RuleEvaluator::new(&graph)
            .evaluate(&rule, &entries, &CancelToken::new())
            .unwrap();

        assert!(result.results[0].found);
        assert_eq!(result.results[0].required_call.id(), "App\\B::second");
        assert!(!result.has_violations());
    }

    #[test]
    fn missing_required_call_carries_rule_message_and_first_target() {
        let graph = CallGraph::new();
        let rule = rule(&["App\\B::first", "App\\B::second"], &[]);
        let entries = vec![EntryPoint::new("App\\S", "exec")];
        let result = RuleEvaluator::new(&graph)
            .evaluate(&rule, &entries, &CancelToken::new())
            .unwrap();

        let violation = &result.results[0];
        assert!(!violation.found);
        assert_eq!(violation.required_call.id(), "App\\B::first");
        assert_eq!(violation.message.as_deref(), Some("must comply"));
        assert!(result.has_violations());
    }

    #[test]
    fn satisfied_obligation_produces_no_violation() {
        let mut graph = CallGraph::new();
        graph.add(edge(("App\\S", "exec"), ("App\\Db", "beginTransaction")));
        graph.add(edge(("App\\S", "exec"), ("App\\Helper", "done")));
        graph.add(edge(("App\\Helper", "done"), ("App\\Db", "commit")));

        let rule = rule(
            &[],
            &[("App\\Db::beginTransaction", &["App\\Db::commit", "App\\Db::rollback"])],
        );
        let entries = vec![EntryPoint::new("App\\S", "exec")];
        let result = RuleEvaluator::new(&graph)
            .evaluate(&rule, &entries, &CancelToken::new())
            .unwrap();

        assert!(result.paired_violations.is_empty());
        assert!(result.results.is_empty());
    }

    #[test]
    fn unpaired_trigger_is_a_violation_with_trigger_witness() {
        let mut graph = CallGraph::new();
        graph.add(edge(("App\\S", "exec"), ("App\\Db", "beginTransaction")));

        let rule = rule(
            &[],
            &[("App\\Db::beginTransaction", &["App\\Db::commit", "App\\Db::rollback"])],
        );
        let entries = vec![EntryPoint::new("App\\S", "exec")];
        let result = RuleEvaluator::new(&graph)
            .evaluate(&rule, &entries, &CancelToken::new())
            .unwrap();

        assert_eq!(result.paired_violations.len(), 1);
        let violation = &result.paired_violations[0];
        let last = violation.trigger_path.last().unwrap();
        assert_eq!(last.callee_id(), Some("App\\Db::beginTransaction".to_string()));
    }

    #[test]
    fn unreachable_trigger_is_vacuously_satisfied() {
        let mut graph = CallGraph::new();
        graph.add(edge(("App\\S", "exec"), ("App\\Mailer", "send")));

        let rule = rule(&[], &[("App\\Db::beginTransaction", &["App\\Db::commit"])]);
        let entries = vec![EntryPoint::new("App\\S", "exec")];
        let result = RuleEvaluator::new(&graph)
            .evaluate(&rule, &entries, &CancelToken::new())
            .unwrap();

        assert!(result.paired_violations.is_empty());
    }

    #[test]
    fn zero_entries_is_a_degenerate_pass() {
        let graph = CallGraph::new();
        let rule = rule(&["App\\B::auth"], &[]);
        let result = RuleEvaluator::new(&graph)
            .evaluate(&rule, &[], &CancelToken::new())
            .unwrap();

        assert!(result.results.is_empty());
        assert!(result.paired_violations.is_empty());
        assert!(!result.has_violations());
    }

    #[test]
    fn cancellation_aborts_between_entry_points() {
        let graph = CallGraph::new();
        let rule = rule(&["App\\B::auth"], &[]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let entries = vec![EntryPoint::new("App\\S", "exec")];
        assert!(matches!(
            RuleEvaluator::new(&graph).evaluate(&rule, &entries, &cancel),
            Err(AnalysisError::Cancelled)
        ));
    }
}
