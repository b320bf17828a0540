//! Error types for settings loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or validating pipeline settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a settings file failed.
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),
    /// A settings file is not valid JSON5.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] json5::Error),
    /// The merged JSON did not decode into the settings model.
    #[error("failed to decode settings: {0}")]
    Decode(#[from] serde_json::Error),
    /// A runtime layer was requested but does not exist.
    #[error("settings layer not found: {}", .0.display())]
    MissingLayer(PathBuf),
    /// A specific field failed validation.
    #[error("invalid settings at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Semantic validation failure.
    #[error("invalid settings: {0}")]
    Invalid(String),
}
