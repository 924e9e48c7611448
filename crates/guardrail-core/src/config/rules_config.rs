//! Rule configuration tables.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::method_ref::MethodRef;

/// The kind of path condition a rule evaluates. Carried into results as a
/// tag so report consumers can distinguish future condition kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCondition {
    /// The entry point must reach one of the required targets.
    #[default]
    MustCall,
}

/// One `[[rules]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub name: String,
    /// Human message attached to violations of this rule.
    pub message: Option<String>,
    #[serde(default)]
    pub condition: PathCondition,
    #[serde(default)]
    pub entry_points: EntryPointsConfig,
    /// Required targets, any-of semantics in declared order.
    #[serde(default)]
    pub required: Vec<MethodRef>,
    #[serde(default)]
    pub paired: Vec<PairedConfig>,
}

impl RuleConfig {
    /// Structural validation. A rule with an empty required list is legal
    /// provided it carries at least one obligation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.required.is_empty() && self.paired.is_empty() {
            return Err(ConfigError::EmptyRule {
                rule: self.name.clone(),
            });
        }
        for paired in &self.paired {
            if paired.completions.is_empty() {
                return Err(ConfigError::NoCompletions {
                    rule: self.name.clone(),
                    trigger: paired.trigger.id(),
                });
            }
        }
        if self.entry_points.is_empty() {
            return Err(ConfigError::MissingEntryPoints {
                rule: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Entry-point source for a rule: glob selectors over the program model,
/// explicit references, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntryPointsConfig {
    /// Glob patterns over fully qualified class names. Backslash and
    /// forward-slash separators are interchangeable.
    pub classes: Vec<String>,
    /// Glob patterns over method names. Empty means every method of the
    /// matched classes.
    pub methods: Vec<String>,
    /// Class patterns excluded after matching.
    pub exclude: Vec<String>,
    /// Explicit `Class::method` entries, appended after selector matches.
    pub explicit: Vec<MethodRef>,
}

impl EntryPointsConfig {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.explicit.is_empty()
    }
}

/// A paired-call obligation: when the trigger is reachable, one of the
/// completions must be reachable too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairedConfig {
    pub trigger: MethodRef,
    pub completions: Vec<MethodRef>,
    pub message: Option<String>,
}
