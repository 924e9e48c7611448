//! Configuration errors raised while building rules and scan settings.

/// Errors raised at configuration-construction time. All of these are fatal:
/// a run never starts with an invalid rule set.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file found (looked for {candidates})")]
    NotFound { candidates: String },

    #[error("failed to read config file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("invalid method reference '{reference}' (expected Class::method)")]
    InvalidMethodRef { reference: String },

    #[error("rule '{rule}' declares neither required calls nor paired obligations")]
    EmptyRule { rule: String },

    #[error("rule '{rule}' has a paired obligation on '{trigger}' with no completions")]
    NoCompletions { rule: String, trigger: String },

    #[error("rule '{rule}' declares no entry-point source")]
    MissingEntryPoints { rule: String },

    #[error("invalid entry-point pattern '{pattern}' in rule '{rule}': {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },

    #[error("unknown rule '{name}' in --rule filter")]
    UnknownRule { name: String },
}
