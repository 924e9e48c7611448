//! Configuration model and loader.
//!
//! Guardrail is configured from a TOML file with a `[scan]` section and one
//! `[[rules]]` table per rule. Default lookup order in the working
//! directory: `guardrail.config.toml`, then `guardrail.toml`.

mod loader;
mod rules_config;
mod scan_config;

pub use loader::{discover_config, CONFIG_CANDIDATES};
pub use rules_config::{EntryPointsConfig, PairedConfig, PathCondition, RuleConfig};
pub use scan_config::ScanConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardrailConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl GuardrailConfig {
    /// Parse a configuration document and validate every rule.
    pub fn from_toml(path: &str, text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Malformed {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&path.display().to_string(), &text)
    }

    /// Validate all rules. Configuration errors are fatal before analysis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in &self.rules {
            rule.validate()?;
        }
        Ok(())
    }

    /// Restrict to the named rules, preserving declaration order.
    pub fn filter_rules(&self, names: &[String]) -> Result<Self, ConfigError> {
        for name in names {
            if !self.rules.iter().any(|r| &r.name == name) {
                return Err(ConfigError::UnknownRule { name: name.clone() });
            }
        }
        Ok(Self {
            scan: self.scan.clone(),
            rules: self
                .rules
                .iter()
                .filter(|r| names.contains(&r.name))
                .cloned()
                .collect(),
        })
    }
}
