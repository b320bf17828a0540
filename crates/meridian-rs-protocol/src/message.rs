//! Opaque payload contract carried by configuration objects.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt::Debug;

/// Schema-describable payload stored in a config's spec or status.
///
/// Registries never look inside a message; the schema catalog checks its
/// `message_name` and hands it to the kind's validation predicate, and
/// generators downcast it to the concrete type they render.
pub trait Message: Any + Debug + Send + Sync + 'static {
    /// Fully-qualified message type name (e.g. `test.MockConfig`).
    fn message_name(&self) -> &str;
    /// Access the concrete value for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Structural equality against another message of any type.
    fn eq_message(&self, other: &dyn Message) -> bool;
    /// Encode the message as a JSON value.
    fn to_value(&self) -> Result<Value, serde_json::Error>;
}

/// Serde-backed message with a static type name.
///
/// Implementing this is the usual way to make a payload type: the blanket
/// impl below provides `Message` for it.
pub trait NamedMessage:
    Serialize + DeserializeOwned + PartialEq + Debug + Send + Sync + 'static
{
    /// Fully-qualified message type name.
    const MESSAGE_NAME: &'static str;
}

impl<T: NamedMessage> Message for T {
    fn message_name(&self) -> &str {
        T::MESSAGE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_message(&self, other: &dyn Message) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl dyn Message {
    /// Borrow the message as `T` if that is its concrete type.
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Whether the message's concrete type is `T`.
    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }
}
