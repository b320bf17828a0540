//! Immutable kind catalog.

use crate::descriptor::SchemaDescriptor;
use crate::error::{RuleViolation, SchemaError};
use crate::label::is_dns1123_label;
use log::debug;
use meridian_rs_protocol::{Config, ConfigDocument, ConfigKey, Message};
use std::collections::BTreeMap;

/// Mapping from kind name to schema descriptor.
///
/// There is no way to add kinds to a built catalog; share it behind an `Arc`
/// and readers never need to synchronize.
///
/// By default a config is checked only for a registered kind and against the
/// kind's predicate. Key label and message type checks are enabled per
/// catalog through [`SchemaCatalogBuilder`].
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    kinds: BTreeMap<String, SchemaDescriptor>,
    strict_keys: bool,
    strict_messages: bool,
}

impl SchemaCatalog {
    /// Start assembling a catalog.
    pub fn builder() -> SchemaCatalogBuilder {
        SchemaCatalogBuilder::default()
    }

    /// Descriptor registered for a kind.
    pub fn get(&self, kind: &str) -> Option<&SchemaDescriptor> {
        self.kinds.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        self.kinds.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Check that the key's kind is registered, returning its descriptor.
    ///
    /// A catalog built with `strict_keys` also requires the name and
    /// namespace to be DNS-1123 labels.
    pub fn validate_key(&self, key: &ConfigKey) -> Result<&SchemaDescriptor, SchemaError> {
        let descriptor = self
            .kinds
            .get(&key.kind)
            .ok_or_else(|| SchemaError::UnknownKind(key.kind.clone()))?;
        if self.strict_keys {
            for (field, value) in [("name", &key.name), ("namespace", &key.namespace)] {
                if !is_dns1123_label(value) {
                    return Err(violation(
                        key,
                        RuleViolation::NotALabel {
                            field,
                            value: value.clone(),
                        },
                    ));
                }
            }
        }
        Ok(descriptor)
    }

    /// Validate a config against its kind's schema.
    ///
    /// Looks up the kind, then runs its predicate on the spec and on the
    /// status when present.
    pub fn validate_config(&self, config: &Config) -> Result<(), SchemaError> {
        let descriptor = self.validate_key(&config.key)?;
        self.check_payload(
            descriptor,
            &config.key,
            &descriptor.message_name,
            config.spec.as_ref(),
        )?;
        if let Some(status) = config.status.as_deref() {
            self.check_payload(
                descriptor,
                &config.key,
                &descriptor.status_message_name,
                status,
            )?;
        }
        Ok(())
    }

    fn check_payload(
        &self,
        descriptor: &SchemaDescriptor,
        key: &ConfigKey,
        expected: &str,
        message: &dyn Message,
    ) -> Result<(), SchemaError> {
        if self.strict_messages && message.message_name() != expected {
            return Err(violation(
                key,
                RuleViolation::MessageType {
                    expected: expected.to_string(),
                    actual: message.message_name().to_string(),
                },
            ));
        }
        descriptor
            .validate(message)
            .map_err(|source| SchemaError::Validation {
                key: key.clone(),
                source,
            })
    }

    /// Decode a document into a validated config of a registered kind.
    pub fn decode_config(&self, document: ConfigDocument) -> Result<Config, SchemaError> {
        let key = document.key();
        let descriptor = self.validate_key(&key)?;
        let decode_spec = descriptor
            .spec_decoder()
            .ok_or_else(|| SchemaError::MissingDecoder(key.kind.clone()))?;
        let spec = decode_spec(document.spec).map_err(|source| SchemaError::Decode {
            key: key.clone(),
            source,
        })?;
        let status = match document.status {
            Some(value) => {
                let decode_status = descriptor
                    .status_decoder()
                    .ok_or_else(|| SchemaError::MissingDecoder(key.kind.clone()))?;
                let status = decode_status(value).map_err(|source| SchemaError::Decode {
                    key: key.clone(),
                    source,
                })?;
                Some(status)
            }
            None => None,
        };
        let config = Config { key, spec, status };
        self.validate_config(&config)?;
        Ok(config)
    }
}

fn violation(key: &ConfigKey, rule: RuleViolation) -> SchemaError {
    SchemaError::Validation {
        key: key.clone(),
        source: Box::new(rule),
    }
}

/// Builder collecting kinds before freezing them into a catalog.
#[derive(Debug, Default)]
pub struct SchemaCatalogBuilder {
    entries: Vec<(String, SchemaDescriptor)>,
    strict_keys: bool,
    strict_messages: bool,
}

impl SchemaCatalogBuilder {
    /// Register a kind.
    pub fn kind(mut self, kind: impl Into<String>, descriptor: SchemaDescriptor) -> Self {
        self.entries.push((kind.into(), descriptor));
        self
    }

    /// Require config names and namespaces to be DNS-1123 labels.
    pub fn strict_keys(mut self, enabled: bool) -> Self {
        self.strict_keys = enabled;
        self
    }

    /// Require payloads to carry the message types registered for their kind.
    pub fn strict_messages(mut self, enabled: bool) -> Self {
        self.strict_messages = enabled;
        self
    }

    /// Freeze the catalog, rejecting empty or duplicate kind names.
    pub fn build(self) -> Result<SchemaCatalog, SchemaError> {
        let mut kinds = BTreeMap::new();
        for (kind, descriptor) in self.entries {
            if kind.is_empty() {
                return Err(SchemaError::EmptyKind);
            }
            if kinds.contains_key(&kind) {
                return Err(SchemaError::DuplicateKind(kind));
            }
            kinds.insert(kind, descriptor);
        }
        debug!(
            "built schema catalog (kinds={}, strict_keys={}, strict_messages={})",
            kinds.len(),
            self.strict_keys,
            self.strict_messages
        );
        Ok(SchemaCatalog {
            kinds,
            strict_keys: self.strict_keys,
            strict_messages: self.strict_messages,
        })
    }
}
