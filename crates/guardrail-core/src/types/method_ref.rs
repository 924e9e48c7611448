//! Method references — `<FQCN>::<method>` pairs used by rules and results.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// A reference to a method on a class, e.g. `App\Auth\Gate::authorize`.
///
/// The class part is a fully qualified class name with backslash separators
/// and no leading backslash; the identifier form `class::method` is the key
/// used by the call graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MethodRef {
    pub class: String,
    pub method: String,
}

impl MethodRef {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Parse a `Class::method` reference. A leading backslash on the class
    /// part is stripped so references and resolved names compare equal.
    pub fn parse(reference: &str) -> Result<Self, ConfigError> {
        let (class, method) = reference
            .rsplit_once("::")
            .ok_or_else(|| ConfigError::InvalidMethodRef {
                reference: reference.to_string(),
            })?;
        let class = class.trim_start_matches('\\');
        if class.is_empty() || method.is_empty() {
            return Err(ConfigError::InvalidMethodRef {
                reference: reference.to_string(),
            });
        }
        Ok(Self::new(class, method))
    }

    /// The call-graph identifier for this reference.
    pub fn id(&self) -> String {
        format!("{}::{}", self.class, self.method)
    }
}

impl std::fmt::Display for MethodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

impl TryFrom<String> for MethodRef {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MethodRef> for String {
    fn from(value: MethodRef) -> Self {
        value.id()
    }
}
