//! Configuration error types

use thiserror::Error;

/// Errors raised while locating, parsing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration sources could not be deserialized
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A loaded value failed a semantic check
    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// An environment variable carried an unusable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two configuration sources were requested that cannot be combined
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Error surfaced by the config crate itself
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
