//! Call graph storage and reachability queries.

use std::collections::VecDeque;

use guardrail_core::{FxHashMap, FxHashSet};

use super::types::MethodCall;

/// Directed multigraph of method identifiers.
///
/// Edges live in one insertion-ordered vector; the outgoing and incoming
/// indexes hold positions into it. Construction is single-threaded; after
/// the passes finish the graph is only ever read.
#[derive(Debug, Default)]
pub struct CallGraph {
    edges: Vec<MethodCall>,
    outgoing: FxHashMap<String, Vec<usize>>,
    incoming: FxHashMap<String, Vec<usize>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge. Unresolved callees are indexed on the outgoing side
    /// only: they are recorded for diagnostics but cannot be traversed.
    pub fn add(&mut self, call: MethodCall) {
        let index = self.edges.len();
        self.outgoing.entry(call.caller_id()).or_default().push(index);
        if let Some(callee) = call.callee_id() {
            self.incoming.entry(callee).or_default().push(index);
        }
        self.edges.push(call);
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[MethodCall] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of a method, in insertion order.
    pub fn outgoing_from<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a MethodCall> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// Incoming edges of a method, in insertion order.
    pub fn incoming_to<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a MethodCall> {
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// Whether an edge with the same `(caller, callee, line, static)`
    /// identity already exists.
    pub fn contains_edge(&self, call: &MethodCall) -> bool {
        let key = call.dedup_key();
        self.outgoing_from(&call.caller_id())
            .any(|existing| existing.dedup_key() == key)
    }

    /// Is `to` reachable from `from` through resolved edges?
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        let mut visited: FxHashSet<String> = FxHashSet::default();
        visited.insert(from.to_string());
        let mut stack = vec![from.to_string()];

        while let Some(current) = stack.pop() {
            for edge in self.outgoing_from(&current) {
                let Some(callee) = edge.callee_id() else { continue };
                if callee == to {
                    return true;
                }
                if visited.insert(callee.clone()) {
                    stack.push(callee);
                }
            }
        }
        false
    }

    /// First depth-first path from `from` to `to`: parent edge before child,
    /// ties broken by edge-insertion order. `None` when unreachable.
    pub fn find_path(&self, from: &str, to: &str) -> Option<Vec<MethodCall>> {
        let mut visited: FxHashSet<String> = FxHashSet::default();
        visited.insert(from.to_string());
        let mut path = Vec::new();
        if self.dfs(from, to, &mut visited, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Shortest witness path from `from` to `to` by hop count, breadth
    /// first; ties broken by edge-insertion order. Useful for the most
    /// readable diagnostics; the evaluator's contract is [`Self::find_path`].
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<MethodCall>> {
        let mut visited: FxHashSet<String> = FxHashSet::default();
        visited.insert(from.to_string());
        // (method id, index of the edge that discovered it)
        let mut predecessor: FxHashMap<String, usize> = FxHashMap::default();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(from.to_string());

        while let Some(current) = queue.pop_front() {
            let Some(indices) = self.outgoing.get(&current) else { continue };
            for &index in indices {
                let edge = &self.edges[index];
                let Some(callee) = edge.callee_id() else { continue };
                if callee == to {
                    // Walk predecessor edges back to the start.
                    let mut path = vec![edge.clone()];
                    let mut cursor = current.clone();
                    while cursor != from {
                        let edge = &self.edges[predecessor[&cursor]];
                        cursor = edge.caller_id();
                        path.push(edge.clone());
                    }
                    path.reverse();
                    return Some(path);
                }
                if visited.insert(callee.clone()) {
                    predecessor.insert(callee.clone(), index);
                    queue.push_back(callee);
                }
            }
        }
        None
    }

    /// Edges whose callee could not be resolved, in insertion order. Kept
    /// for diagnostics; never traversed.
    pub fn unresolved(&self) -> impl Iterator<Item = &MethodCall> {
        self.edges.iter().filter(|e| e.callee_class.is_none())
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    fn dfs(
        &self,
        current: &str,
        target: &str,
        visited: &mut FxHashSet<String>,
        path: &mut Vec<MethodCall>,
    ) -> bool {
        for edge in self.outgoing_from(current) {
            let Some(callee) = edge.callee_id() else { continue };
            if callee == target {
                path.push(edge.clone());
                return true;
            }
            if visited.insert(callee.clone()) {
                path.push(edge.clone());
                if self.dfs(&callee, target, visited, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }
}
