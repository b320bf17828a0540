//! Schema catalog for configuration kinds.
//!
//! A catalog maps each kind to the message types it carries and the
//! predicate its payloads must satisfy. It is built once, then shared
//! read-only by every registry and loader that needs to validate or decode
//! configs of those kinds.

mod catalog;
mod descriptor;
mod error;
mod label;

/// Immutable kind catalog and its builder.
pub use catalog::{SchemaCatalog, SchemaCatalogBuilder};
/// Per-kind schema descriptor and predicate type.
pub use descriptor::{SchemaDescriptor, ValidateFn};
/// Errors raised by validation and decoding.
pub use error::{BoxError, RuleViolation, SchemaError};
/// DNS-1123 label check used for names and namespaces.
pub use label::is_dns1123_label;
