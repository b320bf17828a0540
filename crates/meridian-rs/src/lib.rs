//! Public SDK surface for Meridian.
//!
//! This crate re-exports the registry, schema, and pipeline building blocks
//! and provides a small initialization helper to keep consumer setup
//! consistent.

/// Re-export for convenience.
pub use meridian_rs_config as config;
pub use meridian_rs_core as core;
/// Re-export for convenience.
pub use meridian_rs_protocol as protocol;
pub use meridian_rs_registry as registry;
/// Re-export for convenience.
pub use meridian_rs_schema as schema;

pub use meridian_rs_config::MeridianConfig;
pub use meridian_rs_core::{Consumer, FileConsumer, Generator, Pipeline, PipelineError};
pub use meridian_rs_protocol::{Config, ConfigKey, ConfigOutput, Message, NamedMessage};
pub use meridian_rs_registry::{MemoryRegistry, Registry};
pub use meridian_rs_schema::{SchemaCatalog, SchemaDescriptor};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        if env_logger::try_init().is_ok() {
            log::debug!("logging initialized");
        }
    }
}
