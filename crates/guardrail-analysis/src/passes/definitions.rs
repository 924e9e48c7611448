//! Pass 1 — definition collection.
//!
//! Walks every parsed unit and populates the class hierarchy and type
//! registry: parent links, used traits, implemented interfaces, method
//! definition sites, declared return types, and property types (declared,
//! constructor-promoted, static). Runs to completion before Pass 2 inspects
//! any call site.

use tree_sitter::Node;

use crate::names::{apply_use_declaration, NameResolver};
use crate::parser::{node_text, SourceUnit};

use super::{variable_name, ProgramModel};

/// Pass-1 walker over one source unit.
pub struct DefinitionCollector<'m> {
    model: &'m mut ProgramModel,
}

impl<'m> DefinitionCollector<'m> {
    pub fn collect(model: &'m mut ProgramModel, unit: &SourceUnit) {
        let mut collector = Self { model };
        let mut resolver = NameResolver::new();
        collector.walk(unit.root(), unit.source_bytes(), &unit.file.relative, &mut resolver);
    }

    fn walk(&mut self, node: Node, source: &[u8], file: &str, resolver: &mut NameResolver) {
        match node.kind() {
            "namespace_definition" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                if let Some(body) = node.child_by_field_name("body") {
                    // Braced form: scope the namespace to the block.
                    let saved = resolver.clone();
                    resolver.set_namespace(&name);
                    let mut cursor = body.walk();
                    for child in body.named_children(&mut cursor) {
                        self.walk(child, source, file, resolver);
                    }
                    *resolver = saved;
                } else {
                    resolver.set_namespace(&name);
                }
            }
            "namespace_use_declaration" => {
                apply_use_declaration(node, source, resolver);
            }
            "class_declaration" => {
                self.collect_class(node, source, file, resolver);
            }
            "trait_declaration" => {
                self.collect_trait(node, source, file, resolver);
            }
            "interface_declaration" => {
                self.collect_interface(node, source, file, resolver);
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    self.walk(child, source, file, resolver);
                }
            }
        }
    }

    fn collect_class(&mut self, node: Node, source: &[u8], file: &str, resolver: &NameResolver) {
        let Some(name) = node.child_by_field_name("name") else { return };
        let fqcn = resolver.qualify(node_text(name, source));
        self.model.hierarchy.set_file(&fqcn, file);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "base_clause" => {
                    if let Some(parent) = first_class_name(child, source) {
                        let parent = resolver.resolve(&parent, Some(&fqcn));
                        self.model.hierarchy.set_parent(&fqcn, &parent);
                    }
                }
                "class_interface_clause" => {
                    let interfaces = class_names(child, source)
                        .into_iter()
                        .map(|i| resolver.resolve(&i, Some(&fqcn)))
                        .collect();
                    self.model.hierarchy.set_interfaces(&fqcn, interfaces);
                }
                _ => {}
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(body, source, &fqcn, resolver);
        }
    }

    fn collect_trait(&mut self, node: Node, source: &[u8], file: &str, resolver: &NameResolver) {
        let Some(name) = node.child_by_field_name("name") else { return };
        let fqcn = resolver.qualify(node_text(name, source));
        self.model.hierarchy.mark_trait(&fqcn);
        self.model.hierarchy.set_file(&fqcn, file);

        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(body, source, &fqcn, resolver);
        }
    }

    fn collect_interface(&mut self, node: Node, source: &[u8], file: &str, resolver: &NameResolver) {
        let Some(name) = node.child_by_field_name("name") else { return };
        let fqcn = resolver.qualify(node_text(name, source));
        self.model.hierarchy.mark_interface(&fqcn);
        self.model.hierarchy.set_file(&fqcn, file);

        // `interface A extends B` participates in return-type lookup.
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "base_clause" {
                if let Some(parent) = first_class_name(child, source) {
                    let parent = resolver.resolve(&parent, Some(&fqcn));
                    self.model.hierarchy.set_parent(&fqcn, &parent);
                }
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.collect_members(body, source, &fqcn, resolver);
        }
    }

    /// Shared member walk for classes, traits, and interfaces.
    fn collect_members(&mut self, body: Node, source: &[u8], fqcn: &str, resolver: &NameResolver) {
        let mut traits = Vec::new();

        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "use_declaration" => {
                    for used in class_names(member, source) {
                        traits.push(resolver.resolve(&used, Some(fqcn)));
                    }
                }
                "method_declaration" => {
                    self.collect_method(member, source, fqcn, resolver);
                }
                "property_declaration" => {
                    let declared = member
                        .child_by_field_name("type")
                        .and_then(|t| resolver.resolve_type(t, source, Some(fqcn)));
                    if let Some(declared) = declared {
                        let mut elements = member.walk();
                        for element in member.named_children(&mut elements) {
                            if element.kind() != "property_element" {
                                continue;
                            }
                            let mut inner = element.walk();
                            for part in element.named_children(&mut inner) {
                                if let Some(prop) = variable_name(part, source) {
                                    self.model.registry.add_property_type(fqcn, &prop, &declared);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        if !traits.is_empty() {
            self.model.hierarchy.set_traits(fqcn, traits);
        }
    }

    fn collect_method(&mut self, node: Node, source: &[u8], fqcn: &str, resolver: &NameResolver) {
        let Some(name) = node.child_by_field_name("name") else { return };
        let method = node_text(name, source);
        self.model.hierarchy.add_method_def(fqcn, method);

        if let Some(return_type) = node.child_by_field_name("return_type") {
            if let Some(resolved) = resolver.resolve_type(return_type, source, Some(fqcn)) {
                self.model.hierarchy.add_return_type(fqcn, method, &resolved);
            }
        }

        // Constructor-promoted parameters declare properties on the class.
        if let Some(parameters) = node.child_by_field_name("parameters") {
            let mut cursor = parameters.walk();
            for parameter in parameters.named_children(&mut cursor) {
                if parameter.kind() != "property_promotion_parameter" {
                    continue;
                }
                let declared = parameter
                    .child_by_field_name("type")
                    .and_then(|t| resolver.resolve_type(t, source, Some(fqcn)));
                let prop = parameter
                    .child_by_field_name("name")
                    .and_then(|n| variable_name(n, source));
                if let (Some(declared), Some(prop)) = (declared, prop) {
                    self.model.registry.add_property_type(fqcn, &prop, &declared);
                }
            }
        }
    }
}

/// First class-like name among a node's named children.
fn first_class_name(node: Node, source: &[u8]) -> Option<String> {
    class_names(node, source).into_iter().next()
}

/// All class-like names among a node's named children, in order.
fn class_names(node: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if matches!(child.kind(), "name" | "qualified_name") {
            names.push(node_text(child, source).to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PhpParser;
    use crate::scanner::SourceFile;
    use std::path::PathBuf;

    fn collect(source: &str) -> ProgramModel {
        let mut parser = PhpParser::default();
        let unit = parser
            .parse_unit(SourceFile {
                path: PathBuf::from("/fixture/App.php"),
                relative: "App.php".to_string(),
                source: source.to_string(),
            })
            .expect("fixture must parse");
        let mut model = ProgramModel::default();
        DefinitionCollector::collect(&mut model, &unit);
        model
    }

    #[test]
    fn records_namespaced_class_with_parent_and_interfaces() {
        let model = collect(
            r#"<?php
            namespace App\Http;
            use App\Contracts\Responder;

            class Controller extends BaseController implements Responder, \App\Loggable
            {
                public function handle(): void {}
            }
            "#,
        );
        let h = &model.hierarchy;
        assert!(h.defines_method("App\\Http\\Controller", "handle"));
        assert_eq!(h.parent_of("App\\Http\\Controller"), Some("App\\Http\\BaseController"));
        assert_eq!(
            h.find_classes_implementing("App\\Contracts\\Responder"),
            vec!["App\\Http\\Controller"]
        );
        assert_eq!(
            h.find_classes_implementing("App\\Loggable"),
            vec!["App\\Http\\Controller"]
        );
        assert_eq!(h.file_of("App\\Http\\Controller"), Some("App.php"));
    }

    #[test]
    fn records_trait_and_its_users() {
        let model = collect(
            r#"<?php
            namespace App;

            trait Auditable
            {
                public function audit(): void {}
            }

            class Order
            {
                use Auditable;
            }
            "#,
        );
        let h = &model.hierarchy;
        assert!(h.is_trait("App\\Auditable"));
        assert!(h.defines_method("App\\Auditable", "audit"));
        assert_eq!(h.find_classes_using_trait("App\\Auditable"), vec!["App\\Order"]);
    }

    #[test]
    fn records_interface_method_defs_and_return_types() {
        let model = collect(
            r#"<?php
            namespace App;

            interface Repository
            {
                public function connection(): Db;
            }
            "#,
        );
        let h = &model.hierarchy;
        assert!(h.is_interface("App\\Repository"));
        assert!(h.defines_method("App\\Repository", "connection"));
        assert_eq!(
            h.resolve_method_return_type("App\\Repository", "connection"),
            Some("App\\Db".to_string())
        );
    }

    #[test]
    fn records_declared_and_promoted_property_types() {
        let model = collect(
            r#"<?php
            namespace App;

            class Service
            {
                private Db $db;
                public static ?Logger $logger;

                public function __construct(private Mailer $mailer) {}
            }
            "#,
        );
        let h = &model.hierarchy;
        let r = &model.registry;
        assert_eq!(
            r.resolve_property_type("App\\Service", "db", h),
            Some("App\\Db".to_string())
        );
        assert_eq!(
            r.resolve_property_type("App\\Service", "logger", h),
            Some("App\\Logger".to_string())
        );
        assert_eq!(
            r.resolve_property_type("App\\Service", "mailer", h),
            Some("App\\Mailer".to_string())
        );
    }

    #[test]
    fn method_return_types_resolve_through_imports() {
        let model = collect(
            r#"<?php
            namespace App;
            use Vendor\Db\Connection;

            class Holder
            {
                public function db(): Connection {}
            }
            "#,
        );
        assert_eq!(
            model.hierarchy.resolve_method_return_type("App\\Holder", "db"),
            Some("Vendor\\Db\\Connection".to_string())
        );
    }

    #[test]
    fn union_return_type_collapses_to_first_class_like() {
        let model = collect(
            r#"<?php
            namespace App;

            class Holder
            {
                public function db(): null|Db|Logger {}
            }
            "#,
        );
        assert_eq!(
            model.hierarchy.resolve_method_return_type("App\\Holder", "db"),
            Some("App\\Db".to_string())
        );
    }
}
