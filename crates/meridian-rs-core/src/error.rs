//! Error types for the render and distribute pipeline.

use meridian_rs_protocol::ConfigKey;
use meridian_rs_registry::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a generator while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A listed config carries a payload the generator cannot render.
    #[error("config {key} carries {actual}, expected {expected}")]
    UnexpectedPayload {
        key: ConfigKey,
        expected: String,
        actual: String,
    },
    /// A config the generator depends on is not in the registry.
    #[error("missing config: {0}")]
    MissingConfig(ConfigKey),
    /// Generator-specific failure.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Errors returned by a consumer while distributing outputs.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Writing to the destination failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Encoding distribution metadata failed.
    #[error("failed to encode manifest: {0}")]
    Encode(#[from] serde_json::Error),
    /// The destination refused the outputs.
    #[error("distribution rejected: {0}")]
    Rejected(String),
    /// A file consumer name that cannot be used as a file name prefix.
    #[error("invalid consumer name {0:?}: expected a DNS-1123 label")]
    InvalidName(String),
}

/// Errors returned by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A generator of the consumer failed to render.
    #[error("consumer {consumer}: generator {generator} failed: {source}")]
    Render {
        consumer: String,
        generator: String,
        #[source]
        source: RenderError,
    },
    /// The consumer failed to distribute its outputs.
    #[error("consumer {consumer}: distribution failed: {source}")]
    Distribution {
        consumer: String,
        #[source]
        source: DistributionError,
    },
    /// No consumer is registered under the name.
    #[error("unknown consumer: {0}")]
    UnknownConsumer(String),
    /// A consumer with the same name is already registered.
    #[error("duplicate consumer: {0}")]
    DuplicateConsumer(String),
    /// Loading configured sources failed.
    #[error("failed to load config sources: {0}")]
    Load(#[from] LoadError),
}
