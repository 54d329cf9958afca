//! Configuration loading and typed config structures for a Foundry run.
//!
//! The configuration lives in `foundry-config.yaml` at the working
//! directory. Every field has a default, so an empty file (or none at all)
//! is a valid configuration.
//!
//! ```yaml
//! simulation:
//!   max_steps: 50
//! logging:
//!   level: info
//! scenario: scenarios/two_agent_factory.yaml
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable overriding `simulation.max_steps`.
pub const MAX_STEPS_ENV: &str = "FOUNDRY_MAX_STEPS";

/// Environment variable overriding `scenario`.
pub const SCENARIO_ENV: &str = "FOUNDRY_SCENARIO";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scenario file to run. When absent the built-in two-agent factory
    /// is used.
    #[serde(default)]
    pub scenario: Option<PathBuf>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FOUNDRY_MAX_STEPS` overrides `simulation.max_steps`
    /// - `FOUNDRY_SCENARIO` overrides `scenario`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// An unparsable `FOUNDRY_MAX_STEPS` is logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(MAX_STEPS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(max_steps) => self.simulation.max_steps = max_steps,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid FOUNDRY_MAX_STEPS"),
            }
        }
        if let Some(path) = lookup(SCENARIO_ENV) {
            self.scenario = Some(PathBuf::from(path));
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of steps before the run ends.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_max_steps() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_owned()
}
