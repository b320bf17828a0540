//! Per-kind schema descriptors.

use crate::error::BoxError;
use meridian_rs_protocol::{Message, NamedMessage};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate a kind's payloads must satisfy before a registry accepts them.
pub type ValidateFn = Arc<dyn Fn(&dyn Message) -> Result<(), BoxError> + Send + Sync>;

/// Decoder from a JSON payload into a kind's message type.
pub(crate) type DecodeFn = fn(Value) -> Result<Arc<dyn Message>, serde_json::Error>;

/// Schema registered for one kind.
#[derive(Clone)]
pub struct SchemaDescriptor {
    /// Message type name expected in `spec`.
    pub message_name: String,
    /// Message type name expected in `status`; empty when the kind has none.
    pub status_message_name: String,
    /// Human-readable description of the kind.
    pub description: String,
    validate: ValidateFn,
    decode_spec: Option<DecodeFn>,
    decode_status: Option<DecodeFn>,
}

impl SchemaDescriptor {
    /// Describe a kind by message names alone.
    ///
    /// Payloads are accepted as long as their message names match; configs of
    /// this kind cannot be decoded from documents.
    pub fn new(
        message_name: impl Into<String>,
        status_message_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            message_name: message_name.into(),
            status_message_name: status_message_name.into(),
            description: description.into(),
            validate: Arc::new(accept_all),
            decode_spec: None,
            decode_status: None,
        }
    }

    /// Describe a kind carrying spec type `S` and no status.
    pub fn for_message<S: NamedMessage>(description: impl Into<String>) -> Self {
        let mut descriptor = Self::new(S::MESSAGE_NAME, "", description);
        descriptor.decode_spec = Some(decode::<S> as DecodeFn);
        descriptor
    }

    /// Describe a kind carrying spec type `S` and status type `St`.
    pub fn for_messages<S: NamedMessage, St: NamedMessage>(description: impl Into<String>) -> Self {
        let mut descriptor = Self::new(S::MESSAGE_NAME, St::MESSAGE_NAME, description);
        descriptor.decode_spec = Some(decode::<S> as DecodeFn);
        descriptor.decode_status = Some(decode::<St> as DecodeFn);
        descriptor
    }

    /// Replace the validation predicate.
    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&dyn Message) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.validate = Arc::new(validate);
        self
    }

    /// Run the validation predicate against a payload.
    pub fn validate(&self, message: &dyn Message) -> Result<(), BoxError> {
        (self.validate)(message)
    }

    /// Whether configs of this kind can be decoded from documents.
    pub fn is_decodable(&self) -> bool {
        self.decode_spec.is_some()
    }

    pub(crate) fn spec_decoder(&self) -> Option<DecodeFn> {
        self.decode_spec
    }

    pub(crate) fn status_decoder(&self) -> Option<DecodeFn> {
        self.decode_status
    }
}

impl fmt::Debug for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("message_name", &self.message_name)
            .field("status_message_name", &self.status_message_name)
            .field("description", &self.description)
            .field("decodable", &self.is_decodable())
            .finish_non_exhaustive()
    }
}

fn accept_all(_message: &dyn Message) -> Result<(), BoxError> {
    Ok(())
}

fn decode<T: NamedMessage>(value: Value) -> Result<Arc<dyn Message>, serde_json::Error> {
    let message: T = serde_json::from_value(value)?;
    Ok(Arc::new(message))
}
