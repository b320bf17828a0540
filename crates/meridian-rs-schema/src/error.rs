//! Error types for schema validation and decoding.

use meridian_rs_protocol::ConfigKey;
use thiserror::Error;

/// Boxed error reported by validation predicates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the schema catalog.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No descriptor is registered for the kind.
    #[error("kind {0:?} is not defined")]
    UnknownKind(String),
    /// The config failed the kind's predicate or one of the catalog's
    /// opt-in key and message checks.
    #[error("invalid config {key}: {source}")]
    Validation {
        key: ConfigKey,
        #[source]
        source: BoxError,
    },
    /// A kind was registered twice while building a catalog.
    #[error("kind {0:?} is registered more than once")]
    DuplicateKind(String),
    /// A kind was registered with an empty name.
    #[error("kind name must not be empty")]
    EmptyKind,
    /// The kind was registered without payload decoders.
    #[error("kind {0:?} has no payload decoder")]
    MissingDecoder(String),
    /// A document payload did not deserialize into the kind's message type.
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: ConfigKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the checks a catalog runs when built with
/// [`strict_keys`](crate::SchemaCatalogBuilder::strict_keys) or
/// [`strict_messages`](crate::SchemaCatalogBuilder::strict_messages).
///
/// Reported as the source of [`SchemaError::Validation`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    /// Name or namespace is not a DNS-1123 label.
    #[error("{field} {value:?} is not a DNS-1123 label")]
    NotALabel { field: &'static str, value: String },
    /// Payload message type differs from the one registered for the kind.
    #[error("message type {actual:?} does not match {expected:?}")]
    MessageType { expected: String, actual: String },
}
