//! Error types for amo-publish-core
//!
//! Everything surfaces as [`PublishError`]; configuration problems are
//! caller input errors.

use std::path::PathBuf;
use thiserror::Error;

pub use amo_publish_store::PublishError;

/// Result type alias using PublishError
pub type Result<T> = std::result::Result<T, PublishError>;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for PublishError {
    fn from(err: ConfigError) -> Self {
        PublishError::InvalidInput(err.to_string())
    }
}
