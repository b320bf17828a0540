//! Error types for registry writes and document loading.

use meridian_rs_schema::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by registry writes.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The config failed schema validation; surfaced unchanged.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A storage backend failed to apply the write.
    #[error("registry backend error: {0}")]
    Backend(String),
}

/// Errors returned while loading config documents into a registry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Source contents are not valid JSON5.
    #[error("failed to parse config documents: {0}")]
    Parse(#[from] json5::Error),
    /// A document does not have the `{kind, namespace, name, spec, status}` shape.
    #[error("malformed config document: {0}")]
    Document(#[from] serde_json::Error),
    /// A document failed to decode or validate against its kind.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The registry rejected a write.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
