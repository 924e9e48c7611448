//! Call-graph edge type.

use serde::Serialize;

/// The call-graph identifier of a method.
pub fn method_id(class: &str, method: &str) -> String {
    format!("{}::{}", class, method)
}

/// One call site: an edge from a caller method to a callee method.
///
/// Immutable once emitted. Calls outside any class are dropped before
/// emission, so the caller fields are always present; the callee class is
/// `None` when the receiver could not be resolved (such edges are recorded
/// for diagnostics but never traversed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodCall {
    pub caller_class: String,
    pub caller_method: String,
    pub callee_class: Option<String>,
    pub callee_method: String,
    /// 1-based source line; 0 for synthesized edges.
    pub line: u32,
    pub is_static: bool,
    /// Receiver expression as written, for diagnostics (e.g. `$this->db`).
    pub receiver: Option<String>,
}

impl MethodCall {
    pub fn caller_id(&self) -> String {
        method_id(&self.caller_class, &self.caller_method)
    }

    pub fn callee_id(&self) -> Option<String> {
        self.callee_class
            .as_deref()
            .map(|class| method_id(class, &self.callee_method))
    }

    /// Edge identity used for synthetic-edge deduplication.
    pub fn dedup_key(&self) -> (String, Option<String>, u32, bool) {
        (
            self.caller_id(),
            self.callee_id(),
            self.line,
            self.is_static,
        )
    }
}

impl std::fmt::Display for MethodCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callee = self
            .callee_id()
            .unwrap_or_else(|| format!("?::{}", self.callee_method));
        write!(f, "{} -> {}", self.caller_id(), callee)
    }
}
