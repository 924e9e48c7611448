//! Type registry — declared property types.
//!
//! Records `(class, property) → declared class type` for typed properties,
//! constructor-promoted parameters, and static properties. Resolution walks
//! up the hierarchy, and for traits scans the consuming classes: a trait
//! body references `$this->p` whose type is declared by the class that uses
//! the trait.

use guardrail_core::{FxHashMap, FxHashSet};

use crate::hierarchy::ClassHierarchy;

/// Property-type table, written by Pass 1 and read by Pass 2.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    properties: FxHashMap<String, FxHashMap<String, String>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property_type(&mut self, class: &str, property: &str, class_type: &str) {
        self.properties
            .entry(class.to_string())
            .or_default()
            .insert(property.to_string(), class_type.to_string());
    }

    /// Resolve the declared type of `class::$property`: direct hit, then for
    /// traits any consuming class (first in class-insertion order), then the
    /// parent chain. Cycle-safe via a visited set.
    pub fn resolve_property_type(
        &self,
        class: &str,
        property: &str,
        hierarchy: &ClassHierarchy,
    ) -> Option<String> {
        let mut visited = FxHashSet::default();
        self.resolve_inner(class, property, hierarchy, &mut visited)
    }

    fn resolve_inner(
        &self,
        class: &str,
        property: &str,
        hierarchy: &ClassHierarchy,
        visited: &mut FxHashSet<String>,
    ) -> Option<String> {
        if !visited.insert(class.to_string()) {
            return None;
        }
        if let Some(found) = self.properties.get(class).and_then(|p| p.get(property)) {
            return Some(found.clone());
        }
        if hierarchy.is_trait(class) {
            for user in hierarchy.find_classes_using_trait(class) {
                if let Some(found) = self.resolve_inner(user, property, hierarchy, visited) {
                    return Some(found);
                }
            }
        }
        if let Some(parent) = hierarchy.parent_of(class) {
            return self.resolve_inner(parent, property, hierarchy, visited);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_hit_wins() {
        let mut registry = TypeRegistry::new();
        registry.add_property_type("App\\C", "db", "App\\Db");
        let hierarchy = ClassHierarchy::new();
        assert_eq!(
            registry.resolve_property_type("App\\C", "db", &hierarchy),
            Some("App\\Db".to_string())
        );
    }

    #[test]
    fn resolves_through_parent() {
        let mut registry = TypeRegistry::new();
        registry.add_property_type("App\\Base", "db", "App\\Db");
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.set_parent("App\\C", "App\\Base");
        assert_eq!(
            registry.resolve_property_type("App\\C", "db", &hierarchy),
            Some("App\\Db".to_string())
        );
    }

    #[test]
    fn trait_property_resolves_through_consuming_class() {
        let mut registry = TypeRegistry::new();
        registry.add_property_type("App\\C", "db", "App\\Db");
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.mark_trait("App\\T");
        hierarchy.set_traits("App\\C", vec!["App\\T".to_string()]);
        assert_eq!(
            registry.resolve_property_type("App\\T", "db", &hierarchy),
            Some("App\\Db".to_string())
        );
    }

    #[test]
    fn first_consuming_class_in_insertion_order_wins() {
        let mut registry = TypeRegistry::new();
        registry.add_property_type("App\\First", "db", "App\\DbA");
        registry.add_property_type("App\\Second", "db", "App\\DbB");
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.mark_trait("App\\T");
        hierarchy.set_traits("App\\First", vec!["App\\T".to_string()]);
        hierarchy.set_traits("App\\Second", vec!["App\\T".to_string()]);
        assert_eq!(
            registry.resolve_property_type("App\\T", "db", &hierarchy),
            Some("App\\DbA".to_string())
        );
    }

    #[test]
    fn trait_user_cycles_terminate() {
        let registry = TypeRegistry::new();
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.mark_trait("App\\T");
        hierarchy.set_traits("App\\C", vec!["App\\T".to_string()]);
        hierarchy.set_parent("App\\C", "App\\C");
        assert_eq!(registry.resolve_property_type("App\\T", "missing", &hierarchy), None);
    }
}
