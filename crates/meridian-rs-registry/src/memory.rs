//! In-memory registry backend.

use crate::error::RegistryError;
use crate::registry::Registry;
use log::{debug, warn};
use meridian_rs_protocol::{Config, ConfigKey};
use meridian_rs_schema::SchemaCatalog;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry holding configs in a shared ordered map.
///
/// Keys order by kind, then namespace, then name, so listing a kind (or a
/// kind within one namespace) is a range scan. Clones share the same store.
#[derive(Debug, Clone)]
pub struct MemoryRegistry {
    /// Catalog every write is validated against.
    catalog: Arc<SchemaCatalog>,
    /// Stored configs keyed by identity.
    store: Arc<RwLock<BTreeMap<ConfigKey, Config>>>,
}

impl MemoryRegistry {
    /// Create an empty registry bound to a schema catalog.
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self {
            catalog,
            store: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Catalog used to validate writes.
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Number of stored configs across all kinds.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Keys of every stored config, in key order.
    pub fn keys(&self) -> Vec<ConfigKey> {
        self.store.read().keys().cloned().collect()
    }
}

impl Registry for MemoryRegistry {
    fn get(&self, key: &ConfigKey) -> Option<Config> {
        self.store.read().get(key).cloned()
    }

    fn put(&self, config: Config) -> Result<(), RegistryError> {
        if let Err(err) = self.catalog.validate_config(&config) {
            warn!("rejected config (key={}, error={})", config.key, err);
            return Err(err.into());
        }
        debug!("storing config (key={})", config.key);
        self.store.write().insert(config.key.clone(), config);
        Ok(())
    }

    fn delete(&self, key: &ConfigKey) -> Result<(), RegistryError> {
        if self.store.write().remove(key).is_some() {
            debug!("deleted config (key={key})");
        }
        Ok(())
    }

    fn list(&self, kind: &str, namespace: &str) -> Vec<Config> {
        let start = ConfigKey::new(kind, namespace, "");
        self.store
            .read()
            .range(start..)
            .take_while(|(key, _)| {
                key.kind == kind && (namespace.is_empty() || key.namespace == namespace)
            })
            .map(|(_, config)| config.clone())
            .collect()
    }
}
