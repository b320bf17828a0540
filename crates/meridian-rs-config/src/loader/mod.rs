//! Layered settings loader.
//!
//! Discovers settings layers (system/user/cwd/runtime), checks each against
//! the settings schema, merges them in precedence order, and produces a
//! final validated `MeridianConfig`.

mod layer_io;
mod merge;
mod schema;


use crate::{ConfigError, MeridianConfig};
use log::{debug, info};
use meridian_rs_schema::is_dns1123_label;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "meridian.json5";
/// Default settings directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".meridian";

#[cfg(unix)]
/// Default system settings path on Unix.
const SYSTEM_CONFIG_PATH: &str = "/etc/meridian/meridian.json5";
#[cfg(windows)]
/// Default system settings path on Windows.
const SYSTEM_CONFIG_PATH: &str = "C:\\ProgramData\\meridian\\meridian.json5";

/// Effective settings plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated settings.
    pub config: MeridianConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single settings layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// System-wide settings.
    System,
    /// User-specific settings.
    User,
    /// Current working directory settings.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded settings layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layer discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the cwd layer.
    pub cwd: PathBuf,
    /// Optional system settings path (defaults to `/etc/meridian/meridian.json5` on Unix).
    pub system_config_path: Option<PathBuf>,
    /// Optional user settings path (defaults to `~/.meridian/meridian.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override paths applied last; each must exist.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::default_system_config_path(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl MeridianConfig {
    /// Load settings from a single path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading settings from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, "config")
    }

    /// Load settings from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading settings from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load layered settings using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered settings with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load layered settings using explicit layer locations and overrides.
    ///
    /// Layer precedence (low -> high): system, user, cwd, runtime overrides.
    /// Missing system/user/cwd layers are skipped; runtime layers are required.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = layer_io::normalize_path(&options.cwd)?;
        debug!("normalized cwd for settings load: {}", cwd.display());

        let cwd_path = cwd.join(DEFAULT_CONFIG_FILE);
        let optional = [
            (
                ConfigLayerSource::System,
                options.system_config_path.as_deref(),
            ),
            (ConfigLayerSource::User, options.user_config_path.as_deref()),
            (ConfigLayerSource::Cwd, Some(cwd_path.as_path())),
        ];

        let mut loaded = Vec::new();
        let mut seen_paths = HashSet::new();
        for (source, path) in optional {
            let Some(path) = path else {
                continue;
            };
            if !seen_paths.insert(layer_io::unique_path(path)) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            if let Some(layer) = layer_io::load_optional_layer(source, path)? {
                debug!("loaded {:?} layer", source);
                loaded.push(layer);
            }
        }

        for runtime_path in &options.runtime_paths {
            let layer = layer_io::load_required_layer(ConfigLayerSource::Runtime, runtime_path)?;
            debug!("loaded runtime layer (path={})", runtime_path.display());
            loaded.push(layer);
        }

        let mut merged = Value::Object(serde_json::Map::new());
        let mut layers = Vec::with_capacity(loaded.len());
        for layer in loaded {
            merge::merge_json_values(&mut merged, &layer.value);
            layers.push(layer.meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered settings loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate settings invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, path) in self.sources.paths.iter().enumerate() {
            if path.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    path: format!("sources.paths[{idx}]"),
                    message: "source path must not be empty".to_string(),
                });
            }
        }
        if let Some(namespace) = &self.sources.namespace {
            if !is_dns1123_label(namespace) {
                return Err(ConfigError::InvalidField {
                    path: "sources.namespace".to_string(),
                    message: format!("{namespace:?} is not a DNS-1123 label"),
                });
            }
        }
        let extension = &self.output.extension;
        if extension.is_empty() || extension.contains(['/', '\\', '.']) {
            return Err(ConfigError::Invalid(format!(
                "output extension {extension:?} must be a non-empty name without dots or separators"
            )));
        }
        Ok(())
    }
}

/// Internal representation of a loaded settings layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<MeridianConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: MeridianConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
