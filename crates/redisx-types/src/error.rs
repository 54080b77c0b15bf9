//! Error types shared across redisx crates.

use thiserror::Error;

/// Errors raised while loading settings or parsing domain values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value did not parse into the expected domain type
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Config(err.to_string())
    }
}
