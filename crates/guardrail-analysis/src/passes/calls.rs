//! Pass 2 — call analysis.
//!
//! Walks method bodies after the program model is fully populated, infers
//! receiver types from syntactic evidence, and emits call-graph edges.
//! Receiver inference covers `$this`, typed parameters, local assignments,
//! property fetches (including static and nested), chained calls through
//! declared return types, ternary and null-coalescing alternatives, and
//! `clone`. Anything else stays unresolved: the edge is recorded with an
//! unknown callee and never traversed.

use guardrail_core::FxHashMap;
use tree_sitter::Node;

use crate::graph::{CallGraph, MethodCall};
use crate::names::{apply_use_declaration, NameResolver};
use crate::parser::{line_of, node_text, SourceUnit};

use super::{variable_name, ProgramModel};

/// Pass-2 walker over one source unit.
pub struct CallAnalyzer<'m> {
    model: &'m ProgramModel,
    graph: &'m mut CallGraph,
}

/// Local-variable bindings of the method body being analyzed.
struct MethodContext {
    class: String,
    method: String,
    scope: FxHashMap<String, String>,
}

impl<'m> CallAnalyzer<'m> {
    pub fn analyze(model: &'m ProgramModel, graph: &'m mut CallGraph, unit: &SourceUnit) {
        let mut analyzer = Self { model, graph };
        let mut resolver = NameResolver::new();
        analyzer.walk(unit.root(), unit.source_bytes(), &mut resolver);
    }

    fn walk(&mut self, node: Node, source: &[u8], resolver: &mut NameResolver) {
        match node.kind() {
            "namespace_definition" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                if let Some(body) = node.child_by_field_name("body") {
                    let saved = resolver.clone();
                    resolver.set_namespace(&name);
                    let mut cursor = body.walk();
                    for child in body.named_children(&mut cursor) {
                        self.walk(child, source, resolver);
                    }
                    *resolver = saved;
                } else {
                    resolver.set_namespace(&name);
                }
            }
            "namespace_use_declaration" => {
                apply_use_declaration(node, source, resolver);
            }
            "class_declaration" | "trait_declaration" => {
                let Some(name) = node.child_by_field_name("name") else { return };
                let fqcn = resolver.qualify(node_text(name, source));
                if let Some(body) = node.child_by_field_name("body") {
                    let mut cursor = body.walk();
                    for member in body.named_children(&mut cursor) {
                        if member.kind() == "method_declaration" {
                            self.analyze_method(member, source, &fqcn, resolver);
                        }
                    }
                }
            }
            // Interface methods have no bodies; calls in top-level scripts
            // and free functions are never on a path from an entry point.
            "interface_declaration" | "function_definition" => {}
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk(child, source, resolver);
                }
            }
        }
    }

    fn analyze_method(&mut self, node: Node, source: &[u8], fqcn: &str, resolver: &NameResolver) {
        let Some(name) = node.child_by_field_name("name") else { return };
        // Abstract and interface methods carry no body.
        let Some(body) = node.child_by_field_name("body") else { return };

        let mut ctx = MethodContext {
            class: fqcn.to_string(),
            method: node_text(name, source).to_string(),
            scope: FxHashMap::default(),
        };

        if let Some(parameters) = node.child_by_field_name("parameters") {
            let mut cursor = parameters.walk();
            for parameter in parameters.named_children(&mut cursor) {
                if !matches!(
                    parameter.kind(),
                    "simple_parameter" | "property_promotion_parameter"
                ) {
                    continue;
                }
                let declared = parameter
                    .child_by_field_name("type")
                    .and_then(|t| resolver.resolve_type(t, source, Some(fqcn)));
                let var = parameter
                    .child_by_field_name("name")
                    .and_then(|n| variable_name(n, source));
                if let (Some(declared), Some(var)) = (declared, var) {
                    ctx.scope.insert(var, declared);
                }
            }
        }

        self.visit(body, source, &mut ctx, resolver);
    }

    /// Statement/expression walk: emits edges and tracks assignments.
    fn visit(&mut self, node: Node, source: &[u8], ctx: &mut MethodContext, resolver: &NameResolver) {
        match node.kind() {
            "assignment_expression" => {
                let left = node.child_by_field_name("left");
                let right = node.child_by_field_name("right");
                if let Some(right) = right {
                    self.visit(right, source, ctx, resolver);
                }
                match left {
                    Some(left) if left.kind() == "variable_name" => {
                        // `$v = expr`: rebind when the type resolves, keep
                        // the last known type otherwise.
                        if let (Some(var), Some(right)) = (variable_name(left, source), right) {
                            if let Some(inferred) = self.expression_type(right, source, ctx, resolver)
                            {
                                ctx.scope.insert(var, inferred);
                            }
                        }
                    }
                    Some(left) => self.visit(left, source, ctx, resolver),
                    None => {}
                }
            }
            "member_call_expression" | "nullsafe_member_call_expression" => {
                self.emit_instance_call(node, source, ctx, resolver);
                self.visit_children(node, source, ctx, resolver);
            }
            "scoped_call_expression" => {
                self.emit_static_call(node, source, ctx, resolver);
                self.visit_children(node, source, ctx, resolver);
            }
            "function_call_expression" => {
                self.emit_invocable_call(node, source, ctx, resolver);
                self.visit_children(node, source, ctx, resolver);
            }
            _ => self.visit_children(node, source, ctx, resolver),
        }
    }

    fn visit_children(
        &mut self,
        node: Node,
        source: &[u8],
        ctx: &mut MethodContext,
        resolver: &NameResolver,
    ) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, source, ctx, resolver);
        }
    }

    /// `recv->m(...)` and `recv?->m(...)`.
    fn emit_instance_call(
        &mut self,
        node: Node,
        source: &[u8],
        ctx: &MethodContext,
        resolver: &NameResolver,
    ) {
        let Some(name) = node.child_by_field_name("name") else { return };
        if name.kind() != "name" {
            // `$obj->$m()` — computed names are a documented gap.
            return;
        }
        let method = node_text(name, source).to_string();
        let Some(object) = node.child_by_field_name("object") else { return };

        let receiver_type = self.receiver_class(object, source, ctx, resolver);
        let callee_class = self.resolve_callee(receiver_type, &method, ctx);
        self.push_edge(
            ctx,
            callee_class,
            method,
            line_of(node),
            false,
            Some(node_text(object, source).to_string()),
        );
    }

    /// `C::m(...)` including `self`, `static`, and `parent`.
    fn emit_static_call(
        &mut self,
        node: Node,
        source: &[u8],
        ctx: &MethodContext,
        resolver: &NameResolver,
    ) {
        let Some(name) = node.child_by_field_name("name") else { return };
        if name.kind() != "name" {
            return;
        }
        let method = node_text(name, source).to_string();
        let Some(scope_node) = node.child_by_field_name("scope") else { return };
        let scope_text = node_text(scope_node, source).to_string();

        let hierarchy = &self.model.hierarchy;
        let callee_class = match scope_text.as_str() {
            // `parent` resolves strictly through the parent class chain,
            // bypassing the current class's traits.
            "parent" => hierarchy.parent_of(&ctx.class).map(|parent| {
                hierarchy
                    .resolve_method_class(parent, &method)
                    .unwrap_or_else(|| parent.to_string())
            }),
            "self" | "static" => Some(
                hierarchy
                    .resolve_method_class(&ctx.class, &method)
                    .unwrap_or_else(|| ctx.class.clone()),
            ),
            _ => match scope_node.kind() {
                "name" | "qualified_name" => Some(resolver.resolve(&scope_text, Some(&ctx.class))),
                "variable_name" => self.receiver_class(scope_node, source, ctx, resolver),
                _ => None,
            },
        };

        self.push_edge(ctx, callee_class, method, line_of(node), true, Some(scope_text));
    }

    /// `e(...)` where `e` is a local variable or an invocable property:
    /// a call to `__invoke` on the receiver's class.
    fn emit_invocable_call(
        &mut self,
        node: Node,
        source: &[u8],
        ctx: &MethodContext,
        resolver: &NameResolver,
    ) {
        let Some(mut function) = node.child_by_field_name("function") else { return };
        if function.kind() == "parenthesized_expression" {
            match function.named_child(0) {
                Some(inner) => function = inner,
                None => return,
            }
        }
        match function.kind() {
            "variable_name" => {
                if node_text(function, source) == "$this" {
                    return;
                }
            }
            "member_access_expression" | "nullsafe_member_access_expression" => {}
            // Plain function calls are not part of the method model.
            _ => return,
        }

        let receiver_type = self.receiver_class(function, source, ctx, resolver);
        let callee_class = self.resolve_callee(receiver_type, "__invoke", ctx);
        self.push_edge(
            ctx,
            callee_class,
            "__invoke".to_string(),
            line_of(node),
            false,
            Some(node_text(function, source).to_string()),
        );
    }

    /// When the receiver is the current class, re-resolve through the
    /// hierarchy so the edge points at the body's true defining site
    /// (inherited or trait-provided methods).
    fn resolve_callee(
        &self,
        receiver: Option<String>,
        method: &str,
        ctx: &MethodContext,
    ) -> Option<String> {
        match receiver {
            Some(class) if class == ctx.class => Some(
                self.model
                    .hierarchy
                    .resolve_method_class(&class, method)
                    .unwrap_or(class),
            ),
            other => other,
        }
    }

    fn push_edge(
        &mut self,
        ctx: &MethodContext,
        callee_class: Option<String>,
        callee_method: String,
        line: u32,
        is_static: bool,
        receiver: Option<String>,
    ) {
        self.graph.add(MethodCall {
            caller_class: ctx.class.clone(),
            caller_method: ctx.method.clone(),
            callee_class,
            callee_method,
            line,
            is_static,
            receiver,
        });
    }

    /// Receiver class of an expression: `$this` is the current class,
    /// everything else goes through [`Self::expression_type`].
    fn receiver_class(
        &self,
        node: Node,
        source: &[u8],
        ctx: &MethodContext,
        resolver: &NameResolver,
    ) -> Option<String> {
        if node.kind() == "variable_name" && node_text(node, source) == "$this" {
            return Some(ctx.class.clone());
        }
        self.expression_type(node, source, ctx, resolver)
    }

    /// Syntactic type inference for expressions. Returns the class an
    /// expression evaluates to, or `None` when the evidence is insufficient.
    fn expression_type(
        &self,
        node: Node,
        source: &[u8],
        ctx: &MethodContext,
        resolver: &NameResolver,
    ) -> Option<String> {
        let hierarchy = &self.model.hierarchy;
        let registry = &self.model.registry;

        match node.kind() {
            "parenthesized_expression" => {
                let inner = node.named_child(0)?;
                self.expression_type(inner, source, ctx, resolver)
            }
            "object_creation_expression" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "name" | "qualified_name" => {
                            return Some(
                                resolver.resolve(node_text(child, source), Some(&ctx.class)),
                            );
                        }
                        // `new $cls(...)` — dynamic class name.
                        "variable_name" => return None,
                        _ => {}
                    }
                }
                None
            }
            "variable_name" => {
                let text = node_text(node, source);
                if text == "$this" {
                    return Some(ctx.class.clone());
                }
                ctx.scope.get(text.strip_prefix('$')?).cloned()
            }
            "member_access_expression" | "nullsafe_member_access_expression" => {
                let prop_node = node.child_by_field_name("name")?;
                if prop_node.kind() != "name" {
                    return None;
                }
                let object = node.child_by_field_name("object")?;
                let owner = self.receiver_class(object, source, ctx, resolver)?;
                registry.resolve_property_type(&owner, node_text(prop_node, source), hierarchy)
            }
            "scoped_property_access_expression" => {
                let scope_node = node.child_by_field_name("scope")?;
                let prop = node
                    .child_by_field_name("name")
                    .and_then(|n| variable_name(n, source))?;
                let owner = self.scope_class(scope_node, source, ctx, resolver)?;
                registry.resolve_property_type(&owner, &prop, hierarchy)
            }
            "member_call_expression" | "nullsafe_member_call_expression" => {
                let name = node.child_by_field_name("name")?;
                if name.kind() != "name" {
                    return None;
                }
                let object = node.child_by_field_name("object")?;
                let receiver = self.receiver_class(object, source, ctx, resolver)?;
                hierarchy.resolve_method_return_type(&receiver, node_text(name, source))
            }
            "scoped_call_expression" => {
                let name = node.child_by_field_name("name")?;
                if name.kind() != "name" {
                    return None;
                }
                let scope_node = node.child_by_field_name("scope")?;
                let owner = self.scope_class(scope_node, source, ctx, resolver)?;
                hierarchy.resolve_method_return_type(&owner, node_text(name, source))
            }
            "conditional_expression" => {
                // `cond ? a : b`; the short form `cond ?: b` has no body.
                let body = node
                    .child_by_field_name("body")
                    .and_then(|n| self.expression_type(n, source, ctx, resolver));
                body.or_else(|| {
                    node.child_by_field_name("alternative")
                        .and_then(|n| self.expression_type(n, source, ctx, resolver))
                })
            }
            "binary_expression" => {
                let operator = node.child_by_field_name("operator")?;
                if node_text(operator, source) != "??" {
                    return None;
                }
                let left = node
                    .child_by_field_name("left")
                    .and_then(|n| self.expression_type(n, source, ctx, resolver));
                left.or_else(|| {
                    node.child_by_field_name("right")
                        .and_then(|n| self.expression_type(n, source, ctx, resolver))
                })
            }
            "clone_expression" => {
                let inner = node.named_child(0)?;
                self.expression_type(inner, source, ctx, resolver)
            }
            _ => None,
        }
    }

    /// Class named by a static-call scope: `self`/`static` are the current
    /// class, `parent` follows the parent link, names go through the
    /// resolver, and `$var::` falls back to receiver inference.
    fn scope_class(
        &self,
        node: Node,
        source: &[u8],
        ctx: &MethodContext,
        resolver: &NameResolver,
    ) -> Option<String> {
        let text = node_text(node, source);
        match text {
            "self" | "static" => Some(ctx.class.clone()),
            "parent" => self.model.hierarchy.parent_of(&ctx.class).map(str::to_string),
            _ => match node.kind() {
                "name" | "qualified_name" => Some(resolver.resolve(text, Some(&ctx.class))),
                "variable_name" => self.receiver_class(node, source, ctx, resolver),
                _ => None,
            },
        }
    }
}
