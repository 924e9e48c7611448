//! Call graph — directed multigraph of method identifiers.
//!
//! Edges carry source-site metadata and are stored in insertion order; the
//! outgoing/incoming indexes are keyed by `<FQCN>::<method>` identifiers.
//! Reachability queries are depth-first with a per-search visited set.

mod call_graph;
mod types;

pub use call_graph::CallGraph;
pub use types::{method_id, MethodCall};
