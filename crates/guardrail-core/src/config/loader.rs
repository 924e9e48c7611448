//! Config file discovery.

use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Lookup order for the default configuration file.
pub const CONFIG_CANDIDATES: &[&str] = &["guardrail.config.toml", "guardrail.toml"];

/// Find the configuration file in `dir`, honoring the lookup order.
pub fn discover_config(dir: &Path) -> Result<PathBuf, ConfigError> {
    for candidate in CONFIG_CANDIDATES {
        let path = dir.join(candidate);
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(ConfigError::NotFound {
        candidates: CONFIG_CANDIDATES.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_config_toml_over_plain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("guardrail.toml"), "").unwrap();
        std::fs::write(dir.path().join("guardrail.config.toml"), "").unwrap();
        let found = discover_config(dir.path()).unwrap();
        assert!(found.ends_with("guardrail.config.toml"));
    }

    #[test]
    fn falls_back_to_plain() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("guardrail.toml"), "").unwrap();
        let found = discover_config(dir.path()).unwrap();
        assert!(found.ends_with("guardrail.toml"));
    }

    #[test]
    fn errors_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover_config(dir.path()),
            Err(ConfigError::NotFound { .. })
        ));
    }
}
