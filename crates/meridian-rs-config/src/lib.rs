//! Pipeline settings and layered config loading.
//!
//! This crate owns the Meridian settings schema (where configuration sources
//! live and where rendered output goes), its validation, and the
//! layer-merging logic used to assemble it from system, user, working
//! directory, and runtime files.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
