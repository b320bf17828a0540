//! Sample config kind used by registry and pipeline tests.

use meridian_rs_protocol::{Config, ConfigKey, NamedMessage};
use meridian_rs_schema::{SchemaCatalog, SchemaDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MOCK_KIND: &str = "MockConfig";
pub const MOCK_NAME: &str = "my-qualified-name";
pub const MOCK_NAMESPACE: &str = "test";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigPair {
    pub key: String,
    pub value: String,
}

impl ConfigPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Spec payload of the mock kind: an ordered list of key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default)]
    pub pairs: Vec<ConfigPair>,
}

impl NamedMessage for MockConfig {
    const MESSAGE_NAME: &'static str = "test.MockConfig";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockConfigStatus {}

impl NamedMessage for MockConfigStatus {
    const MESSAGE_NAME: &'static str = "test.MockConfigStatus";
}

/// Catalog registering only the mock kind, accepting every payload.
pub fn mock_catalog() -> Arc<SchemaCatalog> {
    let catalog = SchemaCatalog::builder()
        .kind(
            MOCK_KIND,
            SchemaDescriptor::for_messages::<MockConfig, MockConfigStatus>("Sample config kind"),
        )
        .build()
        .expect("mock catalog");
    Arc::new(catalog)
}

pub fn mock_key() -> ConfigKey {
    ConfigKey::new(MOCK_KIND, MOCK_NAMESPACE, MOCK_NAME)
}

/// The canonical mock object: one `key: value` pair and an empty status.
pub fn mock_object() -> Config {
    Config::new(
        mock_key(),
        MockConfig {
            pairs: vec![ConfigPair::new("key", "value")],
        },
    )
    .with_status(MockConfigStatus {})
}

/// The `index`-th mock config in `namespace`: name `my-qualified-name<index>`
/// with the single pair `key -> <index>`.
pub fn mock_config(namespace: &str, index: usize) -> Config {
    Config::new(
        ConfigKey::new(MOCK_KIND, namespace, format!("{MOCK_NAME}{index}")),
        MockConfig {
            pairs: vec![ConfigPair::new("key", index.to_string())],
        },
    )
}
