//! Engine configuration.
//!
//! Settings are read from `CHANGESET_*` environment variables (nested keys
//! separated by `__`) on top of per-field defaults.
//!
//! # Example
//!
//! ```
//! use changeset_engine::config::EngineSettings;
//!
//! let settings = EngineSettings::new().expect("Failed to load configuration");
//! assert!(!settings.default_group.is_empty());
//! ```

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::text::NewlinePolicy;

/// Environment variable prefix for engine settings.
pub const ENV_PREFIX: &str = "CHANGESET";

/// Label given to hunks outside any detected code structure.
pub const DEFAULT_GROUP: &str = "General";

/// Top-level configuration for the engine.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// How `\r\n` is treated before splitting (default: preserve)
    #[serde(default)]
    pub newline_policy: NewlinePolicy,

    /// Label for hunks outside any structure (default: "General")
    #[serde(default = "default_group")]
    pub default_group: String,

    /// Tag hunks with their enclosing structure (default: true)
    #[serde(default = "default_true")]
    pub semantic_grouping: bool,

    /// Combined line count above which a diff logs a warning (default: 10000)
    #[serde(default = "default_large_input_lines")]
    pub large_input_lines: usize,

    /// Log level used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines (default: false)
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            newline_policy: NewlinePolicy::default(),
            default_group: default_group(),
            semantic_grouping: default_true(),
            large_input_lines: default_large_input_lines(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl EngineSettings {
    /// Creates a new settings instance from environment variables and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_environment(environment_source())
    }

    /// Builds settings from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be deserialized into its field.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

/// The `CHANGESET_*` environment source used by [`EngineSettings::new`].
#[must_use]
pub fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_true() -> bool {
    true
}

fn default_large_input_lines() -> usize {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}
