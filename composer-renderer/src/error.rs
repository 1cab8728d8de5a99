//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during decoding or export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Resource loading or decoding failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Scene rendering or encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Writing the exported file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
