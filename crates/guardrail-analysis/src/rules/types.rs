//! Runtime rule model, built from validated configuration.

use guardrail_core::{ConfigError, MethodRef, PairedConfig, PathCondition, RuleConfig};
use serde::Serialize;
use smallvec::SmallVec;

use crate::entry_points::EntryPointSelector;

/// A paired-call obligation: when the trigger is reachable from an entry
/// point, at least one completion must be reachable too.
#[derive(Debug, Clone, Serialize)]
pub struct PairedCallObligation {
    pub trigger: MethodRef,
    /// Any-of completion set; almost always `commit`/`rollback`-sized.
    pub completions: SmallVec<[MethodRef; 2]>,
    pub message: Option<String>,
}

impl From<&PairedConfig> for PairedCallObligation {
    fn from(config: &PairedConfig) -> Self {
        Self {
            trigger: config.trigger.clone(),
            completions: SmallVec::from_vec(config.completions.clone()),
            message: config.message.clone(),
        }
    }
}

/// A compiled rule: entry-point selector plus obligations.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub message: Option<String>,
    pub condition: PathCondition,
    pub selector: EntryPointSelector,
    /// Required targets, any-of semantics in declared order.
    pub required: Vec<MethodRef>,
    pub paired: Vec<PairedCallObligation>,
}

impl Rule {
    /// Compile a validated rule config. Re-validates so the invariants hold
    /// for callers constructing configs programmatically.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            message: config.message.clone(),
            condition: config.condition,
            selector: EntryPointSelector::from_config(&config.name, &config.entry_points)?,
            required: config.required.clone(),
            paired: config.paired.iter().map(PairedCallObligation::from).collect(),
        })
    }

    /// Compile every rule of a config document, preserving order.
    pub fn from_configs(configs: &[RuleConfig]) -> Result<Vec<Self>, ConfigError> {
        configs.iter().map(Self::from_config).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_core::EntryPointsConfig;

    #[test]
    fn compiles_a_valid_config() {
        let config = RuleConfig {
            name: "tx".to_string(),
            message: None,
            condition: PathCondition::MustCall,
            entry_points: EntryPointsConfig {
                classes: vec!["App\\*".to_string()],
                ..Default::default()
            },
            required: Vec::new(),
            paired: vec![PairedConfig {
                trigger: MethodRef::parse("App\\Db::beginTransaction").unwrap(),
                completions: vec![MethodRef::parse("App\\Db::commit").unwrap()],
                message: None,
            }],
        };
        let rule = Rule::from_config(&config).unwrap();
        assert_eq!(rule.paired.len(), 1);
        assert!(rule.required.is_empty());
    }

    #[test]
    fn rejects_an_empty_rule() {
        let config = RuleConfig {
            name: "empty".to_string(),
            message: None,
            condition: PathCondition::MustCall,
            entry_points: EntryPointsConfig {
                classes: vec!["App\\*".to_string()],
                ..Default::default()
            },
            required: Vec::new(),
            paired: Vec::new(),
        };
        assert!(matches!(
            Rule::from_config(&config),
            Err(ConfigError::EmptyRule { .. })
        ));
    }
}
