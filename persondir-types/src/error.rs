//! Error types shared by attribute sources and engines.

use thiserror::Error;

/// Result type for attribute operations.
pub type AttributeResult<T> = Result<T, AttributeError>;

/// Errors that can occur while resolving attributes.
///
/// Only [`AttributeError::SourceFailure`] is recoverable. Every other variant
/// describes a caller or configuration mistake and always reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// A required collaborator (sources, merger, cache store) is missing.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The caller passed an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A single source failed at runtime.
    #[error("source '{source_name}' failed: {message}")]
    SourceFailure {
        source_name: String,
        message: String,
    },

    /// A pattern was tested against a value that is not text.
    #[error("attribute '{attribute}' holds a non-text value and cannot be pattern matched")]
    NonTextValue { attribute: String },

    /// A configured pattern failed to compile.
    #[error("invalid pattern for attribute '{attribute}': {message}")]
    InvalidPattern { attribute: String, message: String },
}

impl AttributeError {
    /// Shorthand for a [`AttributeError::SourceFailure`].
    pub fn source_failure(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceFailure {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Whether an aggregating engine may log this error and move on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceFailure { .. })
    }
}
