//! The three analysis passes.
//!
//! Pass 1 populates the program model (hierarchy + type registry) from every
//! parsed unit. Pass 2 walks the same units again — after Pass 1 has fully
//! completed, because receiver resolution depends on types that may be
//! declared later in file order — and emits call edges. Pass 3 links
//! interface methods to their statically known implementors.

mod calls;
mod definitions;
mod interfaces;

pub use calls::CallAnalyzer;
pub use definitions::DefinitionCollector;
pub use interfaces::InterfaceLinker;

use tree_sitter::Node;

use crate::hierarchy::ClassHierarchy;
use crate::parser::node_text;
use crate::registry::TypeRegistry;

/// The mutable tables built by Pass 1 and read by Pass 2. Frozen (borrowed
/// immutably) for the rest of the run once population finishes.
#[derive(Debug, Default)]
pub struct ProgramModel {
    pub hierarchy: ClassHierarchy,
    pub registry: TypeRegistry,
}

/// Name of a `variable_name` node without the `$` sigil.
pub(crate) fn variable_name(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "variable_name" {
        return None;
    }
    node_text(node, source)
        .strip_prefix('$')
        .map(str::to_string)
}
