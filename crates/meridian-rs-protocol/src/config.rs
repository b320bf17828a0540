//! Configuration objects and their serialisable document form.

use crate::ConfigKey;
use crate::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// A stored configuration object: key, spec payload, optional status payload.
///
/// Payloads are shared behind `Arc`, so cloning a config is cheap and never
/// copies message contents. Registries replace configs wholesale and never
/// mutate them in place.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity of the object.
    pub key: ConfigKey,
    /// Kind-specific configuration content.
    pub spec: Arc<dyn Message>,
    /// Companion status message, if any.
    pub status: Option<Arc<dyn Message>>,
}

impl Config {
    /// Create a config without a status payload.
    pub fn new(key: ConfigKey, spec: impl Message) -> Self {
        Self {
            key,
            spec: Arc::new(spec),
            status: None,
        }
    }

    /// Attach a status payload.
    pub fn with_status(mut self, status: impl Message) -> Self {
        self.status = Some(Arc::new(status));
        self
    }

    pub fn kind(&self) -> &str {
        &self.key.kind
    }

    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Borrow the spec as `T` if that is its concrete type.
    pub fn spec_as<T: Message>(&self) -> Option<&T> {
        (*self.spec).downcast_ref::<T>()
    }

    /// Borrow the status as `T` if present and of that type.
    pub fn status_as<T: Message>(&self) -> Option<&T> {
        self.status
            .as_deref()
            .and_then(|status| status.downcast_ref::<T>())
    }

    /// Encode the config as a JSON document.
    pub fn to_document(&self) -> Result<ConfigDocument, serde_json::Error> {
        let status = match &self.status {
            Some(status) => Some(status.to_value()?),
            None => None,
        };
        Ok(ConfigDocument {
            kind: self.key.kind.clone(),
            namespace: self.key.namespace.clone(),
            name: self.key.name.clone(),
            spec: self.spec.to_value()?,
            status,
        })
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        if self.key != other.key || !self.spec.eq_message(other.spec.as_ref()) {
            return false;
        }
        match (&self.status, &other.status) {
            (None, None) => true,
            (Some(left), Some(right)) => left.eq_message(right.as_ref()),
            _ => false,
        }
    }
}

/// JSON form of a config, as read from and written to source files.
///
/// Payloads stay untyped here; the schema catalog decodes them into the
/// kind's message types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    pub spec: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

impl ConfigDocument {
    /// Key identified by this document.
    pub fn key(&self) -> ConfigKey {
        ConfigKey::new(&self.kind, &self.namespace, &self.name)
    }
}
