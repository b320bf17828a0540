//! Registry contract shared by every storage backend.

use crate::error::RegistryError;
use meridian_rs_protocol::{Config, ConfigKey};

/// Namespace filter matching every namespace in `Registry::list`.
pub const ALL_NAMESPACES: &str = "";

/// CRUD store of configuration objects keyed by `ConfigKey`.
///
/// Implementations must make each `put`/`delete` atomic with respect to
/// concurrent readers: a `get` or `list` observes an entry either before or
/// after a write, never partially applied.
pub trait Registry: Send + Sync {
    /// Fetch the config stored at `key`. Absence is `None`, never an error.
    fn get(&self, key: &ConfigKey) -> Option<Config>;

    /// Validate `config` and store it, replacing any config at the same key.
    ///
    /// A config that fails validation is not stored and the registry is
    /// left unchanged.
    fn put(&self, config: Config) -> Result<(), RegistryError>;

    /// Remove the config at `key`. Removing an absent key succeeds.
    fn delete(&self, key: &ConfigKey) -> Result<(), RegistryError>;

    /// Every config of `kind` in `namespace`, or in all namespaces when
    /// `namespace` is empty (`ALL_NAMESPACES`). Order is backend-defined.
    fn list(&self, kind: &str, namespace: &str) -> Vec<Config>;
}
