//! Pass 3 — interface linking.
//!
//! Call sites through interface-typed receivers emit edges to `I::m`. This
//! pass synthesizes an edge `I::m -> X::m` for every statically known
//! implementor `X` that defines `m`, letting reachability dispatch into all
//! implementations. Over-approximation is intentional: the tool hunts
//! unreached obligations, so reachability errs on the generous side.

use guardrail_core::FxHashSet;

use crate::graph::{CallGraph, MethodCall};
use crate::hierarchy::ClassHierarchy;

pub struct InterfaceLinker;

impl InterfaceLinker {
    /// Synthesize interface fan-out edges. Idempotent: edges are deduped by
    /// `(caller, callee, line, static)`, so repeated linking leaves the
    /// graph unchanged.
    pub fn link(hierarchy: &ClassHierarchy, graph: &mut CallGraph) {
        // Distinct interface-targeted methods, in edge-insertion order.
        let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
        let mut targets: Vec<(String, String)> = Vec::new();
        for edge in graph.edges() {
            let Some(class) = &edge.callee_class else { continue };
            if hierarchy.is_interface(class) {
                let key = (class.clone(), edge.callee_method.clone());
                if seen.insert(key.clone()) {
                    targets.push(key);
                }
            }
        }

        for (interface, method) in targets {
            let implementors: Vec<String> = hierarchy
                .find_classes_implementing(&interface)
                .into_iter()
                .map(str::to_string)
                .collect();
            for implementor in implementors {
                if !hierarchy.defines_method(&implementor, &method) {
                    continue;
                }
                let call = MethodCall {
                    caller_class: interface.clone(),
                    caller_method: method.clone(),
                    callee_class: Some(implementor),
                    callee_method: method.clone(),
                    line: 0,
                    is_static: false,
                    receiver: None,
                };
                if !graph.contains_edge(&call) {
                    graph.add(call);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy_with_two_implementors() -> ClassHierarchy {
        let mut h = ClassHierarchy::new();
        h.mark_interface("App\\UserCase");
        h.set_interfaces("App\\Primary", vec!["App\\UserCase".to_string()]);
        h.set_interfaces("App\\Secondary", vec!["App\\UserCase".to_string()]);
        h.add_method_def("App\\Primary", "execute");
        h.add_method_def("App\\Secondary", "execute");
        h
    }

    fn interface_call() -> MethodCall {
        MethodCall {
            caller_class: "App\\Ctrl".to_string(),
            caller_method: "run".to_string(),
            callee_class: Some("App\\UserCase".to_string()),
            callee_method: "execute".to_string(),
            line: 4,
            is_static: false,
            receiver: Some("$uc".to_string()),
        }
    }

    #[test]
    fn fans_out_to_every_defining_implementor() {
        let h = hierarchy_with_two_implementors();
        let mut graph = CallGraph::new();
        graph.add(interface_call());

        InterfaceLinker::link(&h, &mut graph);

        let synthetic: Vec<_> = graph
            .outgoing_from("App\\UserCase::execute")
            .map(|e| e.callee_id().unwrap())
            .collect();
        assert_eq!(synthetic, vec!["App\\Primary::execute", "App\\Secondary::execute"]);
        assert!(graph.edges().iter().filter(|e| e.line == 0).all(|e| !e.is_static));
    }

    #[test]
    fn skips_implementors_without_a_definition() {
        let mut h = ClassHierarchy::new();
        h.mark_interface("App\\UserCase");
        h.set_interfaces("App\\Primary", vec!["App\\UserCase".to_string()]);
        let mut graph = CallGraph::new();
        graph.add(interface_call());

        InterfaceLinker::link(&h, &mut graph);
        assert_eq!(graph.outgoing_from("App\\UserCase::execute").count(), 0);
    }

    #[test]
    fn linking_twice_is_idempotent() {
        let h = hierarchy_with_two_implementors();
        let mut graph = CallGraph::new();
        graph.add(interface_call());

        InterfaceLinker::link(&h, &mut graph);
        let after_first = graph.edge_count();
        InterfaceLinker::link(&h, &mut graph);
        assert_eq!(graph.edge_count(), after_first);
    }
}
