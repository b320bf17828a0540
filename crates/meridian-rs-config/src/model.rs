//! Settings schema for Meridian.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root settings for a Meridian pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MeridianConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl MeridianConfig {
    /// Start building settings programmatically with defaults applied.
    pub fn builder() -> MeridianConfigBuilder {
        MeridianConfigBuilder::new()
    }

    /// Source document paths, with relative entries resolved against `base`.
    pub fn resolve_source_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.sources
            .paths
            .iter()
            .map(|path| resolve(base, path))
            .collect()
    }

    /// Output directory, resolved against `base`; `base` itself when unset.
    pub fn resolve_output_dir(&self, base: &Path) -> PathBuf {
        match &self.output.dir {
            Some(dir) => resolve(base, dir),
            None => base.to_path_buf(),
        }
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Builder for assembling a `MeridianConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MeridianConfigBuilder {
    config: MeridianConfig,
}

impl MeridianConfigBuilder {
    /// Create a new builder seeded with default settings.
    pub fn new() -> Self {
        Self {
            config: MeridianConfig::default(),
        }
    }

    /// Replace the source settings.
    pub fn sources(mut self, sources: SourcesConfig) -> Self {
        self.config.sources = sources;
        self
    }

    /// Append one source document path.
    pub fn source_path(mut self, path: impl Into<String>) -> Self {
        self.config.sources.paths.push(path.into());
        self
    }

    /// Replace the output settings.
    pub fn output(mut self, output: OutputConfig) -> Self {
        self.config.output = output;
        self
    }

    /// Finalize and return the built `MeridianConfig`.
    pub fn build(self) -> MeridianConfig {
        self.config
    }
}

/// Where configuration documents are read from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourcesConfig {
    /// JSON5 files holding one document or an array of documents.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Namespace applied to documents that omit one.
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Where and how rendered output is written by file consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<String>,
    /// Write a `.sources.json` provenance manifest next to each output.
    #[serde(default = "default_manifest")]
    pub manifest: bool,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            manifest: default_manifest(),
            extension: default_extension(),
        }
    }
}

fn default_manifest() -> bool {
    true
}

/// Default file extension for rendered output.
fn default_extension() -> String {
    "out".to_string()
}
