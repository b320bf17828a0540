//! Configuration registry: the CRUD store of kind-typed config objects.
//!
//! `Registry` is the contract every storage backend implements;
//! `MemoryRegistry` is the in-process backend. The `documents` module loads
//! JSON5 source files into any registry through a schema catalog.

pub mod documents;
pub mod error;
pub mod memory;
pub mod registry;

/// Document loading helpers.
pub use documents::{decode_documents, encode_documents, load_path, load_sources};
/// Registry and loader error types.
pub use error::{LoadError, RegistryError};
/// In-memory registry backend.
pub use memory::MemoryRegistry;
/// Registry contract.
pub use registry::{ALL_NAMESPACES, Registry};
