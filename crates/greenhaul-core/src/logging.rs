//! Tracing subscriber installation.
//!
//! The library crates never install a subscriber themselves; a host calls
//! [`init`] once at startup. `RUST_LOG` overrides the configured level.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Errors from subscriber installation.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log level '{level}': {reason}")]
    InvalidLevel {
        /// The configured directive.
        level: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {reason}")]
    AlreadyInstalled {
        /// The error reported by `tracing-subscriber`.
        reason: String,
    },
}

/// Build the filter: `RUST_LOG` if set and valid, otherwise the configured level.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidLevel {
        level: config.level.clone(),
        reason: e.to_string(),
    })
}

/// Install a formatted `tracing` subscriber for the whole process.
///
/// Writes JSON lines when `config.json` is set.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidLevel`] for a bad filter directive, or
/// [`LoggingError::AlreadyInstalled`] if a global subscriber exists.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = filter(config)?;
    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };
    installed.map_err(|e| LoggingError::AlreadyInstalled {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_builds_filter() {
        let config = LoggingConfig {
            level: "greenhaul_orders=debug,info".to_owned(),
            json: false,
        };
        assert!(filter(&config).is_ok());
    }

    #[test]
    fn second_init_reports_error_instead_of_panicking() {
        let config = LoggingConfig::default();
        // The first call may already fail if another test installed one.
        let _ = init(&config);
        let second = init(&config);
        assert!(matches!(second, Err(LoggingError::AlreadyInstalled { .. })));
    }
}
