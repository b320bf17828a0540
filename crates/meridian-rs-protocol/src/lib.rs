//! Data model shared by the registry, schema catalog, and render pipeline.

mod config;
mod message;

pub use config::{Config, ConfigDocument};
pub use message::{Message, NamedMessage};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a configuration object.
///
/// Keys order by kind, then namespace, then name, which lets ordered stores
/// answer per-kind and per-namespace listings with a range scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigKey {
    /// Type tag selecting the schema and generators that apply.
    pub kind: String,
    /// Namespace the object lives in.
    pub namespace: String,
    /// Object name, unique within kind and namespace.
    pub name: String,
}

impl ConfigKey {
    /// Build a key from kind, namespace, and name (in that order).
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Artifact rendered from registry contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOutput {
    /// Keys that contributed to `content`, in the order they were consumed.
    pub sources: Vec<ConfigKey>,
    /// Rendered bytes.
    pub content: Vec<u8>,
}

impl ConfigOutput {
    /// Create an output from its provenance and content.
    pub fn new(sources: Vec<ConfigKey>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            sources,
            content: content.into(),
        }
    }

    /// Content as UTF-8 text, if valid.
    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn keys_order_by_kind_then_namespace_then_name() {
        let keys: BTreeSet<ConfigKey> = [
            ConfigKey::new("Route", "b", "a"),
            ConfigKey::new("Listener", "z", "z"),
            ConfigKey::new("Route", "a", "b"),
            ConfigKey::new("Route", "a", "a"),
        ]
        .into_iter()
        .collect();

        let rendered = keys.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec!["Listener/z/z", "Route/a/a", "Route/a/b", "Route/b/a"]
        );
    }

    #[test]
    fn output_exposes_utf8_content() {
        let output = ConfigOutput::new(vec![ConfigKey::new("Route", "a", "a")], "key: 0\n");
        assert_eq!(output.content_str(), Some("key: 0\n"));
        assert_eq!(ConfigOutput::new(Vec::new(), vec![0xff_u8]).content_str(), None);
    }
}
