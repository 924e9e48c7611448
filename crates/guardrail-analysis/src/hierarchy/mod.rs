//! Class hierarchy — parent links, traits, interfaces, and method tables.
//!
//! Populated once by Pass 1 through the write APIs, then read by Pass 2 and
//! the evaluator. Method lookup order is the class itself, its used traits
//! in declaration order, then the parent chain: an imported trait's method
//! shadows an inherited parent method of the same name.

use guardrail_core::{FxHashMap, FxHashSet};

/// The class/trait/interface model of the analyzed program.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    /// Every declared class-like, in insertion (declaration) order.
    classes: Vec<String>,
    known: FxHashSet<String>,
    parents: FxHashMap<String, String>,
    traits_used: FxHashMap<String, Vec<String>>,
    interfaces: FxHashMap<String, Vec<String>>,
    /// Methods defined (with a body site) per class, in declaration order.
    methods: FxHashMap<String, Vec<String>>,
    return_types: FxHashMap<String, FxHashMap<String, String>>,
    trait_names: FxHashSet<String>,
    interface_names: FxHashSet<String>,
    files: FxHashMap<String, String>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, class: &str) {
        if self.known.insert(class.to_string()) {
            self.classes.push(class.to_string());
        }
    }

    // --- write APIs (Pass 1) ---

    pub fn set_parent(&mut self, class: &str, parent: &str) {
        self.register(class);
        self.parents.insert(class.to_string(), parent.to_string());
    }

    pub fn set_traits(&mut self, class: &str, traits: Vec<String>) {
        self.register(class);
        self.traits_used.insert(class.to_string(), traits);
    }

    pub fn set_interfaces(&mut self, class: &str, interfaces: Vec<String>) {
        self.register(class);
        self.interfaces.insert(class.to_string(), interfaces);
    }

    pub fn mark_trait(&mut self, name: &str) {
        self.register(name);
        self.trait_names.insert(name.to_string());
    }

    pub fn mark_interface(&mut self, name: &str) {
        self.register(name);
        self.interface_names.insert(name.to_string());
    }

    pub fn add_method_def(&mut self, class: &str, method: &str) {
        self.register(class);
        let methods = self.methods.entry(class.to_string()).or_default();
        if !methods.iter().any(|m| m == method) {
            methods.push(method.to_string());
        }
    }

    pub fn add_return_type(&mut self, class: &str, method: &str, return_type: &str) {
        self.register(class);
        self.return_types
            .entry(class.to_string())
            .or_default()
            .insert(method.to_string(), return_type.to_string());
    }

    pub fn set_file(&mut self, class: &str, file: &str) {
        self.register(class);
        self.files.insert(class.to_string(), file.to_string());
    }

    // --- read APIs (Pass 2, Pass 3, evaluation) ---

    pub fn is_trait(&self, name: &str) -> bool {
        self.trait_names.contains(name)
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.interface_names.contains(name)
    }

    pub fn parent_of(&self, class: &str) -> Option<&str> {
        self.parents.get(class).map(String::as_str)
    }

    pub fn defines_method(&self, class: &str, method: &str) -> bool {
        self.methods
            .get(class)
            .map(|methods| methods.iter().any(|m| m == method))
            .unwrap_or(false)
    }

    /// Every declared class-like, in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Methods defined on `class`, in declaration order.
    pub fn methods_of(&self, class: &str) -> &[String] {
        self.methods.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn file_of(&self, class: &str) -> Option<&str> {
        self.files.get(class).map(String::as_str)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }

    /// The FQCN that lexically owns `method` when looked up from `class`:
    /// the class itself, its used traits in declaration order, then the
    /// parent chain. Cycle-safe via a visited set.
    pub fn resolve_method_class(&self, class: &str, method: &str) -> Option<String> {
        let mut visited = FxHashSet::default();
        self.resolve_method_class_inner(class, method, &mut visited)
    }

    fn resolve_method_class_inner(
        &self,
        class: &str,
        method: &str,
        visited: &mut FxHashSet<String>,
    ) -> Option<String> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        if self.defines_method(class, method) {
            return Some(class.to_string());
        }
        if let Some(traits) = self.traits_used.get(class) {
            for used in traits {
                if let Some(found) = self.resolve_method_class_inner(used, method, visited) {
                    return Some(found);
                }
            }
        }
        if let Some(parent) = self.parents.get(class) {
            return self.resolve_method_class_inner(parent, method, visited);
        }
        None
    }

    /// Declared return type of `method` looked up from `class`, searching
    /// the same order as [`resolve_method_class`].
    pub fn resolve_method_return_type(&self, class: &str, method: &str) -> Option<String> {
        let mut visited = FxHashSet::default();
        self.resolve_return_type_inner(class, method, &mut visited)
    }

    fn resolve_return_type_inner(
        &self,
        class: &str,
        method: &str,
        visited: &mut FxHashSet<String>,
    ) -> Option<String> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        if let Some(found) = self.return_types.get(class).and_then(|m| m.get(method)) {
            return Some(found.clone());
        }
        if let Some(traits) = self.traits_used.get(class) {
            for used in traits {
                if let Some(found) = self.resolve_return_type_inner(used, method, visited) {
                    return Some(found);
                }
            }
        }
        if let Some(parent) = self.parents.get(class) {
            return self.resolve_return_type_inner(parent, method, visited);
        }
        None
    }

    /// Classes declaring `interface` in their implements list, stable by
    /// class insertion order.
    pub fn find_classes_implementing(&self, interface: &str) -> Vec<&str> {
        self.classes
            .iter()
            .filter(|class| {
                self.interfaces
                    .get(*class)
                    .map(|list| list.iter().any(|i| i == interface))
                    .unwrap_or(false)
            })
            .map(String::as_str)
            .collect()
    }

    /// Classes using `trait_name`, stable by class insertion order.
    pub fn find_classes_using_trait(&self, trait_name: &str) -> Vec<&str> {
        self.classes
            .iter()
            .filter(|class| {
                self.traits_used
                    .get(*class)
                    .map(|list| list.iter().any(|t| t == trait_name))
                    .unwrap_or(false)
            })
            .map(String::as_str)
            .collect()
    }
}
