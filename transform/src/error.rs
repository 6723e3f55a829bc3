//! Error types for project configuration and transformation settings.

use thiserror::Error;

/// Errors that can occur while loading targets or building their
/// transformation configuration.
#[derive(Debug, Error)]
pub enum TransformError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The project configuration has no target with this name.
    #[error("unknown target: {0}")]
    UnknownTarget(String),

    /// No target was given and the project has no default target.
    #[error("no target specified and no default target configured")]
    NoTarget,
}

/// Convenience alias for results with [`TransformError`].
pub type Result<T> = std::result::Result<T, TransformError>;
