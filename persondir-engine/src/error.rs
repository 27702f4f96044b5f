//! Error types for directory configuration.

use persondir_types::AttributeError;
use thiserror::Error;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or building a directory.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but describes an unusable directory.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A component rejected its configuration.
    #[error("attribute error: {0}")]
    Attribute(#[from] AttributeError),
}
