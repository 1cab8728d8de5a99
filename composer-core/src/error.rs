//! Error types for composer operations.

use thiserror::Error;

/// Result type for composer operations.
pub type ComposerResult<T> = Result<T, ComposerError>;

/// Errors that can occur in composer operations.
///
/// Record lookups that miss are not errors; the services report them with a
/// `false` or `None` return instead.
#[derive(Debug, Error)]
pub enum ComposerError {
    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Scene or config serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
