//! Configuration loading and typed config structures for a Greenhaul session.
//!
//! The canonical configuration lives in `greenhaul-config.yaml` at the
//! project root. Every section and every field is optional; missing values
//! take the defaults of the shipped maps. Loading parses first and then
//! validates, so a bad value fails fast with a reason instead of surfacing
//! as odd behavior mid-session.

use std::path::Path;

use greenhaul_ledger::{CompletionPolicy, ScoringRules};
use greenhaul_orders::ScheduleConfig;
use greenhaul_supply::SupplyConfig;
use serde::Deserialize;

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

    /// The configuration parsed but describes an unusable session.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level session configuration.
///
/// Mirrors the structure of `greenhaul-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionConfig {
    /// Session identity and randomness.
    #[serde(default)]
    pub session: SessionSection,

    /// Batch release timing and throttling.
    #[serde(default)]
    pub orders: ScheduleConfig,

    /// Completion thresholds.
    #[serde(default)]
    pub completion: CompletionPolicy,

    /// Points per item and full-order bonus.
    #[serde(default)]
    pub scoring: ScoringRules,

    /// Greenhouse growth.
    #[serde(default)]
    pub supply: SupplyConfig,

    /// Player limits.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SessionConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first failing value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orders.validate().map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        self.supply.validate().map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        if self.player.carry_capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("player.carry_capacity must be at least 1"),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: String::from("logging.level must not be empty"),
            });
        }
        Ok(())
    }
}

/// Session identity and randomness.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSection {
    /// Display name of the map, used in score summaries.
    #[serde(default = "default_map_name")]
    pub map_name: String,

    /// Seed for the session RNG. `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            map_name: default_map_name(),
            seed: None,
        }
    }
}

/// Player limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerConfig {
    /// Maximum number of plants carried at once, across all items.
    #[serde(default = "default_carry_capacity")]
    pub carry_capacity: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            carry_capacity: default_carry_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression). `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_map_name() -> String {
    "Map 1".to_owned()
}

const fn default_carry_capacity() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}
