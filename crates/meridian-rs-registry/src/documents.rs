//! Loading JSON5 config documents into a registry.
//!
//! A source holds either a single document or an array of documents, each
//! shaped like `ConfigDocument`. Every document in a load is decoded and
//! validated before the first write, so a bad document leaves the registry
//! untouched.

use crate::error::LoadError;
use crate::registry::Registry;
use log::{debug, info};
use meridian_rs_protocol::{Config, ConfigDocument};
use meridian_rs_schema::SchemaCatalog;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Decode JSON5 contents into validated configs.
///
/// Documents without a namespace take `default_namespace` when given.
pub fn decode_documents(
    catalog: &SchemaCatalog,
    contents: &str,
    default_namespace: Option<&str>,
) -> Result<Vec<Config>, LoadError> {
    let value: Value = json5::from_str(contents)?;
    let values = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    values
        .into_iter()
        .map(|value| -> Result<Config, LoadError> {
            let mut document: ConfigDocument = serde_json::from_value(value)?;
            if document.namespace.is_empty() {
                if let Some(namespace) = default_namespace {
                    document.namespace = namespace.to_string();
                }
            }
            Ok(catalog.decode_config(document)?)
        })
        .collect()
}

/// Encode configs as a pretty-printed JSON array of documents.
pub fn encode_documents(configs: &[Config]) -> Result<String, LoadError> {
    let documents = configs
        .iter()
        .map(Config::to_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&documents)?)
}

/// Load one source file into `registry`, returning how many configs were stored.
pub fn load_path(
    registry: &dyn Registry,
    catalog: &SchemaCatalog,
    path: impl AsRef<Path>,
    default_namespace: Option<&str>,
) -> Result<usize, LoadError> {
    let configs = read_source(catalog, path.as_ref(), default_namespace)?;
    store(registry, configs)
}

/// Load several source files into `registry`.
///
/// All files are decoded before any config is stored.
pub fn load_sources(
    registry: &dyn Registry,
    catalog: &SchemaCatalog,
    paths: &[PathBuf],
    default_namespace: Option<&str>,
) -> Result<usize, LoadError> {
    let mut configs = Vec::new();
    for path in paths {
        configs.extend(read_source(catalog, path, default_namespace)?);
    }
    let count = store(registry, configs)?;
    info!(
        "loaded config sources (files={}, configs={})",
        paths.len(),
        count
    );
    Ok(count)
}

fn read_source(
    catalog: &SchemaCatalog,
    path: &Path,
    default_namespace: Option<&str>,
) -> Result<Vec<Config>, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let configs = decode_documents(catalog, &contents, default_namespace)?;
    debug!(
        "decoded config source (path={}, configs={})",
        path.display(),
        configs.len()
    );
    Ok(configs)
}

fn store(registry: &dyn Registry, configs: Vec<Config>) -> Result<usize, LoadError> {
    let count = configs.len();
    for config in configs {
        registry.put(config)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{decode_documents, encode_documents, load_path, load_sources};
    use crate::{LoadError, MemoryRegistry, Registry};
    use meridian_rs_protocol::{ConfigKey, NamedMessage};
    use meridian_rs_schema::{SchemaCatalog, SchemaDescriptor, SchemaError};
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Upstream {
        host: String,
        port: u16,
    }

    impl NamedMessage for Upstream {
        const MESSAGE_NAME: &'static str = "proxy.Upstream";
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct UpstreamStatus {
        healthy: bool,
    }

    impl NamedMessage for UpstreamStatus {
        const MESSAGE_NAME: &'static str = "proxy.UpstreamStatus";
    }

    fn catalog() -> Arc<SchemaCatalog> {
        let catalog = SchemaCatalog::builder()
            .kind(
                "Upstream",
                SchemaDescriptor::for_messages::<Upstream, UpstreamStatus>("Proxy upstream"),
            )
            .build()
            .expect("catalog");
        Arc::new(catalog)
    }

    #[test]
    fn decodes_single_document_and_arrays() {
        let catalog = catalog();
        let single = r#"{ kind: "Upstream", namespace: "edge", name: "api",
            spec: { host: "api.internal", port: 8080 } }"#;
        let configs = decode_documents(&catalog, single, None).expect("single");
        assert_eq!(configs.len(), 1);
        assert_eq!(
            configs[0].spec_as::<Upstream>(),
            Some(&Upstream {
                host: "api.internal".to_string(),
                port: 8080,
            })
        );

        let array = r#"[
            { kind: "Upstream", namespace: "edge", name: "a", spec: { host: "a", port: 1 } },
            { kind: "Upstream", namespace: "edge", name: "b", spec: { host: "b", port: 2 },
              status: { healthy: true } },
        ]"#;
        let configs = decode_documents(&catalog, array, None).expect("array");
        assert_eq!(configs.len(), 2);
        assert_eq!(
            configs[1].status_as::<UpstreamStatus>(),
            Some(&UpstreamStatus { healthy: true })
        );
    }

    #[test]
    fn applies_default_namespace_only_when_missing() {
        let catalog = catalog();
        let contents = r#"[
            { kind: "Upstream", name: "a", spec: { host: "a", port: 1 } },
            { kind: "Upstream", namespace: "other", name: "b", spec: { host: "b", port: 2 } },
        ]"#;
        let configs = decode_documents(&catalog, contents, Some("edge")).expect("decode");
        let keys = configs.iter().map(|c| c.key.clone()).collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                ConfigKey::new("Upstream", "edge", "a"),
                ConfigKey::new("Upstream", "other", "b"),
            ]
        );

        let configs = decode_documents(&catalog, contents, None).expect("no default");
        assert_eq!(configs[0].key, ConfigKey::new("Upstream", "", "a"));
    }

    #[test]
    fn reports_malformed_input() {
        let catalog = catalog();
        let err = decode_documents(&catalog, "{ kind: ", None).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));

        let err = decode_documents(&catalog, r#"{ kind: "Upstream", extra: 1 }"#, None)
            .unwrap_err();
        assert!(matches!(err, LoadError::Document(_)));

        let err = decode_documents(
            &catalog,
            r#"{ kind: "Upstream", namespace: "edge", name: "a", spec: { host: 1 } }"#,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Schema(SchemaError::Decode { .. })));
    }

    #[test]
    fn bad_document_leaves_registry_untouched() {
        let catalog = catalog();
        let registry = MemoryRegistry::new(catalog.clone());
        let temp = TempDir::new().expect("tmp");
        let good = temp.path().join("good.json5");
        fs::write(
            &good,
            r#"{ kind: "Upstream", namespace: "edge", name: "a", spec: { host: "a", port: 1 } }"#,
        )
        .expect("write");
        let bad = temp.path().join("bad.json5");
        fs::write(
            &bad,
            r#"{ kind: "Route", namespace: "edge", name: "b", spec: {} }"#,
        )
        .expect("write");

        let err = load_sources(&registry, &catalog, &[good.clone(), bad], None).unwrap_err();
        assert!(matches!(err, LoadError::Schema(SchemaError::UnknownKind(_))));
        assert!(registry.is_empty());

        let count = load_path(&registry, &catalog, &good, None).expect("load");
        assert_eq!(count, 1);
        assert!(
            registry
                .get(&ConfigKey::new("Upstream", "edge", "a"))
                .is_some()
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let catalog = catalog();
        let registry = MemoryRegistry::new(catalog.clone());
        let temp = TempDir::new().expect("tmp");
        let missing = temp.path().join("missing.json5");

        let err = load_path(&registry, &catalog, &missing, None).unwrap_err();
        assert!(matches!(err, LoadError::Read { ref path, .. } if *path == missing));
        assert!(format!("{err}").contains("missing.json5"));
    }

    #[test]
    fn encoded_documents_load_back() {
        let catalog = catalog();
        let contents = r#"[
            { kind: "Upstream", namespace: "edge", name: "a", spec: { host: "a", port: 1 },
              status: { healthy: false } },
        ]"#;
        let configs = decode_documents(&catalog, contents, None).expect("decode");
        let encoded = encode_documents(&configs).expect("encode");
        assert!(encoded.contains("\"healthy\": false"), "{encoded}");
        assert_eq!(
            decode_documents(&catalog, &encoded, None).expect("decode again"),
            configs
        );
    }
}
