//! Name resolution — short names to fully qualified names.
//!
//! A resolver carries the current namespace and the import map built from
//! `use` declarations. Both are scoped: the passes snapshot and restore the
//! resolver around braced namespace blocks.

use guardrail_core::FxHashMap;
use tree_sitter::Node;

use crate::parser::node_text;

/// Contextual name resolver for one file position.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    namespace: String,
    imports: FxHashMap<String, String>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current namespace (empty for the global namespace).
    pub fn set_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.trim_matches('\\').to_string();
    }

    /// Record an import: `use App\Auth\Gate;` or `use App\Auth\Gate as G;`.
    pub fn add_import(&mut self, short: &str, fqcn: &str) {
        self.imports
            .insert(short.to_string(), fqcn.trim_start_matches('\\').to_string());
    }

    /// Qualify a declaration name with the current namespace. Declarations
    /// never go through the import map.
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }

    /// Resolve a class-like name at a use site.
    ///
    /// Order: fully qualified as-is; `self`/`static` to the enclosing
    /// class-like; import-map substitution on the first segment; namespace
    /// prefixing; otherwise the name as given.
    pub fn resolve(&self, name: &str, current_class: Option<&str>) -> String {
        if let Some(stripped) = name.strip_prefix('\\') {
            return stripped.to_string();
        }
        if name == "self" || name == "static" {
            return match current_class {
                Some(class) => class.to_string(),
                None => name.to_string(),
            };
        }

        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if let Some(base) = self.imports.get(first) {
            return match rest {
                Some(rest) => format!("{}\\{}", base, rest),
                None => base.clone(),
            };
        }

        if !self.namespace.is_empty() {
            return format!("{}\\{}", self.namespace, name);
        }
        name.to_string()
    }

    /// Resolve a type expression node to a class-like FQCN.
    ///
    /// Nullable types unwrap; union and intersection types collapse to their
    /// first concrete class-like member; primitive types yield none.
    pub fn resolve_type(
        &self,
        node: Node,
        source: &[u8],
        current_class: Option<&str>,
    ) -> Option<String> {
        match node.kind() {
            "optional_type" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if let Some(resolved) = self.resolve_type(child, source, current_class) {
                        return Some(resolved);
                    }
                }
                None
            }
            "union_type" | "intersection_type" | "type_list" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if let Some(resolved) = self.resolve_type(child, source, current_class) {
                        return Some(resolved);
                    }
                }
                None
            }
            "named_type" | "name" | "qualified_name" => {
                let text = node_text(node, source);
                if text.is_empty() || is_builtin_type(text) {
                    None
                } else {
                    Some(self.resolve(text, current_class))
                }
            }
            // int, string, bool, array, void, mixed, ...
            "primitive_type" => None,
            _ => None,
        }
    }
}

/// Builtin type names that are never class-like. `self` and `static` are
/// deliberately absent: in type position they resolve to the enclosing
/// class.
fn is_builtin_type(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "null"
            | "true"
            | "false"
            | "bool"
            | "boolean"
            | "int"
            | "integer"
            | "float"
            | "double"
            | "string"
            | "array"
            | "object"
            | "callable"
            | "iterable"
            | "void"
            | "never"
            | "mixed"
            | "resource"
            | "parent"
    )
}

/// Apply a `use` declaration to the resolver. Handles plain and aliased
/// class imports; `use function` and `use const` are ignored.
pub(crate) fn apply_use_declaration(node: Node, source: &[u8], resolver: &mut NameResolver) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        // `use function strlen;` / `use const App\LIMIT;`
        if child.kind() == "function" || child.kind() == "const" {
            return;
        }
    }

    let mut cursor = node.walk();
    for clause in node.named_children(&mut cursor) {
        if clause.kind() != "namespace_use_clause" {
            continue;
        }
        let mut fqcn = None;
        let mut alias = None;
        let mut inner = clause.walk();
        for part in clause.named_children(&mut inner) {
            match part.kind() {
                "name" | "qualified_name" => {
                    fqcn = Some(node_text(part, source).to_string());
                }
                "namespace_aliasing_clause" => {
                    let mut alias_cursor = part.walk();
                    for alias_part in part.named_children(&mut alias_cursor) {
                        if alias_part.kind() == "name" {
                            alias = Some(node_text(alias_part, source).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
        if let Some(fqcn) = fqcn {
            let short = alias.unwrap_or_else(|| {
                fqcn.rsplit('\\').next().unwrap_or(&fqcn).to_string()
            });
            resolver.add_import(&short, &fqcn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_qualified_names_pass_through() {
        let resolver = NameResolver::new();
        assert_eq!(resolver.resolve("\\App\\Db", None), "App\\Db");
    }

    #[test]
    fn self_and_static_resolve_to_enclosing_class() {
        let resolver = NameResolver::new();
        assert_eq!(resolver.resolve("self", Some("App\\Db")), "App\\Db");
        assert_eq!(resolver.resolve("static", Some("App\\Db")), "App\\Db");
        assert_eq!(resolver.resolve("self", None), "self");
    }

    #[test]
    fn imports_substitute_the_first_segment() {
        let mut resolver = NameResolver::new();
        resolver.add_import("Gate", "App\\Auth\\Gate");
        assert_eq!(resolver.resolve("Gate", None), "App\\Auth\\Gate");
        assert_eq!(resolver.resolve("Gate\\Inner", None), "App\\Auth\\Gate\\Inner");
    }

    #[test]
    fn namespace_prefixes_unimported_names() {
        let mut resolver = NameResolver::new();
        resolver.set_namespace("App\\Http");
        assert_eq!(resolver.resolve("Kernel", None), "App\\Http\\Kernel");
    }

    #[test]
    fn unqualified_global_names_pass_through() {
        let resolver = NameResolver::new();
        assert_eq!(resolver.resolve("Kernel", None), "Kernel");
    }

    #[test]
    fn aliased_import_wins_over_namespace() {
        let mut resolver = NameResolver::new();
        resolver.set_namespace("App");
        resolver.add_import("G", "App\\Auth\\Gate");
        assert_eq!(resolver.resolve("G", None), "App\\Auth\\Gate");
    }
}
