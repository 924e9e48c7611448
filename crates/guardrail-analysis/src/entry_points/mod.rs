//! Entry-point selection.
//!
//! An entry point is a (class, method) pair at which reachability analysis
//! begins. Each rule brings its own source: glob patterns over fully
//! qualified class names and method names, plus explicit `Class::method`
//! references. Selection scans the hierarchy's concrete definition sites in
//! class insertion order, so the result order is deterministic.

use globset::{Glob, GlobSet, GlobSetBuilder};
use guardrail_core::{ConfigError, EntryPointsConfig, FxHashSet, MethodRef};
use serde::Serialize;

use crate::hierarchy::ClassHierarchy;

/// A (class, method) pair at which reachability analysis begins.
#[derive(Debug, Clone, Serialize)]
pub struct EntryPoint {
    pub class: String,
    pub method: String,
    pub file: Option<String>,
    pub route_path: Option<String>,
    pub http_method: Option<String>,
    pub description: Option<String>,
}

impl EntryPoint {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            file: None,
            route_path: None,
            http_method: None,
            description: None,
        }
    }

    /// The call-graph identifier of this entry point.
    pub fn id(&self) -> String {
        crate::graph::method_id(&self.class, &self.method)
    }
}

/// Compiled entry-point source of one rule.
///
/// FQCN patterns are matched with namespace separators normalized to `/`,
/// so `App\Http\*` and `App/Http/*` select the same classes; a bare `*`
/// matches across separators.
#[derive(Debug, Clone)]
pub struct EntryPointSelector {
    classes: GlobSet,
    has_classes: bool,
    methods: GlobSet,
    has_methods: bool,
    exclude: GlobSet,
    explicit: Vec<MethodRef>,
}

impl EntryPointSelector {
    pub fn from_config(rule: &str, config: &EntryPointsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            classes: build_globs(rule, &config.classes)?,
            has_classes: !config.classes.is_empty(),
            methods: build_globs(rule, &config.methods)?,
            has_methods: !config.methods.is_empty(),
            exclude: build_globs(rule, &config.exclude)?,
            explicit: config.explicit.clone(),
        })
    }

    /// Collect entry points from the frozen hierarchy. Interfaces are
    /// skipped (their methods have no bodies); explicit references are
    /// appended after selector matches, deduplicated.
    pub fn collect(&self, hierarchy: &ClassHierarchy) -> Vec<EntryPoint> {
        let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
        let mut entries = Vec::new();

        if self.has_classes {
            for class in hierarchy.classes() {
                if hierarchy.is_interface(class) {
                    continue;
                }
                let normalized = class.replace('\\', "/");
                if !self.classes.is_match(&normalized) || self.exclude.is_match(&normalized) {
                    continue;
                }
                for method in hierarchy.methods_of(class) {
                    if self.has_methods && !self.methods.is_match(method) {
                        continue;
                    }
                    if seen.insert((class.to_string(), method.clone())) {
                        let mut entry = EntryPoint::new(class, method.clone());
                        entry.file = hierarchy.file_of(class).map(str::to_string);
                        entries.push(entry);
                    }
                }
            }
        }

        for reference in &self.explicit {
            if seen.insert((reference.class.clone(), reference.method.clone())) {
                let mut entry = EntryPoint::new(&reference.class, &reference.method);
                entry.file = hierarchy.file_of(&reference.class).map(str::to_string);
                entries.push(entry);
            }
        }

        entries
    }
}

fn build_globs(rule: &str, patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = pattern.replace('\\', "/");
        let glob = Glob::new(&normalized).map_err(|e| ConfigError::InvalidPattern {
            rule: rule.to_string(),
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        rule: rule.to_string(),
        pattern: String::new(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> ClassHierarchy {
        let mut h = ClassHierarchy::new();
        h.add_method_def("App\\Http\\UserController", "show");
        h.add_method_def("App\\Http\\UserController", "store");
        h.set_file("App\\Http\\UserController", "app/UserController.php");
        h.add_method_def("App\\Http\\HealthController", "ping");
        h.add_method_def("App\\Jobs\\SendMail", "handle");
        h.mark_interface("App\\Http\\Responder");
        h.add_method_def("App\\Http\\Responder", "respond");
        h
    }

    fn config(classes: &[&str], methods: &[&str], exclude: &[&str]) -> EntryPointsConfig {
        EntryPointsConfig {
            classes: classes.iter().map(|s| s.to_string()).collect(),
            methods: methods.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            explicit: Vec::new(),
        }
    }

    #[test]
    fn class_patterns_select_methods_with_files() {
        let selector =
            EntryPointSelector::from_config("r", &config(&["App\\Http\\*"], &[], &[])).unwrap();
        let entries = selector.collect(&hierarchy());
        let ids: Vec<String> = entries.iter().map(EntryPoint::id).collect();
        assert_eq!(
            ids,
            vec![
                "App\\Http\\UserController::show",
                "App\\Http\\UserController::store",
                "App\\Http\\HealthController::ping",
            ]
        );
        assert_eq!(entries[0].file.as_deref(), Some("app/UserController.php"));
    }

    #[test]
    fn interfaces_are_never_entry_points() {
        let selector =
            EntryPointSelector::from_config("r", &config(&["App\\**"], &[], &[])).unwrap();
        let entries = selector.collect(&hierarchy());
        assert!(entries.iter().all(|e| e.class != "App\\Http\\Responder"));
    }

    #[test]
    fn method_patterns_and_excludes_narrow_the_selection() {
        let selector = EntryPointSelector::from_config(
            "r",
            &config(&["App\\Http\\*"], &["s*"], &["App\\Http\\HealthController"]),
        )
        .unwrap();
        let ids: Vec<String> = selector
            .collect(&hierarchy())
            .iter()
            .map(EntryPoint::id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "App\\Http\\UserController::show",
                "App\\Http\\UserController::store",
            ]
        );
    }

    #[test]
    fn explicit_references_are_appended_once() {
        let mut cfg = config(&["App\\Http\\UserController"], &["show"], &[]);
        cfg.explicit = vec![
            MethodRef::parse("App\\Http\\UserController::show").unwrap(),
            MethodRef::parse("App\\Jobs\\SendMail::handle").unwrap(),
        ];
        let selector = EntryPointSelector::from_config("r", &cfg).unwrap();
        let ids: Vec<String> = selector
            .collect(&hierarchy())
            .iter()
            .map(EntryPoint::id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "App\\Http\\UserController::show",
                "App\\Jobs\\SendMail::handle",
            ]
        );
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let result = EntryPointSelector::from_config("r", &config(&["App\\[unclosed"], &[], &[]));
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
