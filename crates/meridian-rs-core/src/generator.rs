//! Generator contract: render registry contents into outputs.

use crate::error::RenderError;
use meridian_rs_protocol::{Config, ConfigKey, ConfigOutput, Message, NamedMessage};
use meridian_rs_registry::Registry;

/// Produces rendered outputs from the contents of a registry.
///
/// Rendering only reads the registry. Every output should name, in
/// `sources`, the keys of the configs it was derived from.
pub trait Generator: Send + Sync {
    /// Name used in logs and errors; defaults to the implementing type's name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Render outputs from the current registry contents.
    fn render(&self, registry: &dyn Registry) -> Result<Vec<ConfigOutput>, RenderError>;
}

/// Borrow a config's spec as `T`, or report the payload mismatch.
pub fn expect_spec<T: NamedMessage>(config: &Config) -> Result<&T, RenderError> {
    config
        .spec_as::<T>()
        .ok_or_else(|| RenderError::UnexpectedPayload {
            key: config.key.clone(),
            expected: T::MESSAGE_NAME.to_string(),
            actual: Message::message_name(config.spec.as_ref()).to_string(),
        })
}

/// Fetch a config another config depends on, or report it missing.
pub fn require_config(registry: &dyn Registry, key: &ConfigKey) -> Result<Config, RenderError> {
    registry
        .get(key)
        .ok_or_else(|| RenderError::MissingConfig(key.clone()))
}

#[cfg(test)]
mod tests {
    use super::{Generator, expect_spec, require_config};
    use crate::RenderError;
    use meridian_rs_protocol::{Config, ConfigKey, ConfigOutput, NamedMessage};
    use meridian_rs_registry::{MemoryRegistry, Registry};
    use meridian_rs_schema::{SchemaCatalog, SchemaDescriptor};
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Host {
        address: String,
    }

    impl NamedMessage for Host {
        const MESSAGE_NAME: &'static str = "net.Host";
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Port {
        number: u16,
    }

    impl NamedMessage for Port {
        const MESSAGE_NAME: &'static str = "net.Port";
    }

    struct HostsFile;

    impl Generator for HostsFile {
        fn render(&self, registry: &dyn Registry) -> Result<Vec<ConfigOutput>, RenderError> {
            let mut content = String::new();
            let mut sources = Vec::new();
            for config in registry.list("Host", "") {
                let host = expect_spec::<Host>(&config)?;
                content.push_str(&format!("{} {}\n", host.address, config.name()));
                sources.push(config.key.clone());
            }
            Ok(vec![ConfigOutput::new(sources, content)])
        }
    }

    /// Pairs each host with the port stored under the same namespace and name.
    struct HostPorts;

    impl Generator for HostPorts {
        fn render(&self, registry: &dyn Registry) -> Result<Vec<ConfigOutput>, RenderError> {
            let mut outputs = Vec::new();
            for config in registry.list("Host", "") {
                let host = expect_spec::<Host>(&config)?;
                let port_key = ConfigKey::new("Port", config.namespace(), config.name());
                let port_config = require_config(registry, &port_key)?;
                let port = expect_spec::<Port>(&port_config)?;
                outputs.push(ConfigOutput::new(
                    vec![config.key.clone(), port_key],
                    format!("{}:{}\n", host.address, port.number),
                ));
            }
            Ok(outputs)
        }
    }

    fn host_and_port_registry() -> MemoryRegistry {
        let catalog = SchemaCatalog::builder()
            .kind("Host", SchemaDescriptor::for_message::<Host>("Static host"))
            .kind("Port", SchemaDescriptor::for_message::<Port>("Listening port"))
            .build()
            .expect("catalog");
        MemoryRegistry::new(Arc::new(catalog))
    }

    #[test]
    fn dependent_lookups_report_missing_configs() {
        let registry = host_and_port_registry();
        registry
            .put(Config::new(
                ConfigKey::new("Host", "lan", "web"),
                Host {
                    address: "10.0.0.2".to_string(),
                },
            ))
            .expect("put host");

        let err = HostPorts.render(&registry).unwrap_err();
        assert_eq!(err.to_string(), "missing config: Port/lan/web");
        assert!(matches!(
            err,
            RenderError::MissingConfig(ref key) if key == &ConfigKey::new("Port", "lan", "web")
        ));

        registry
            .put(Config::new(
                ConfigKey::new("Port", "lan", "web"),
                Port { number: 8080 },
            ))
            .expect("put port");
        let outputs = HostPorts.render(&registry).expect("render");
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].content_str(), Some("10.0.0.2:8080\n"));
        assert_eq!(outputs[0].sources.len(), 2);
    }

    #[test]
    fn default_name_is_the_type_name() {
        let generator: Arc<dyn Generator> = Arc::new(HostsFile);
        assert!(generator.name().ends_with("HostsFile"), "{}", generator.name());
    }

    #[test]
    fn renders_listed_configs() {
        let catalog = SchemaCatalog::builder()
            .kind("Host", SchemaDescriptor::for_message::<Host>("Static host"))
            .build()
            .expect("catalog");
        let registry = MemoryRegistry::new(Arc::new(catalog));
        registry
            .put(Config::new(
                ConfigKey::new("Host", "lan", "printer"),
                Host {
                    address: "10.0.0.9".to_string(),
                },
            ))
            .expect("put");

        let outputs = HostsFile.render(&registry).expect("render");
        assert_eq!(
            outputs,
            vec![ConfigOutput::new(
                vec![ConfigKey::new("Host", "lan", "printer")],
                "10.0.0.9 printer\n",
            )]
        );
    }

    #[test]
    fn expect_spec_reports_mismatch() {
        let config = Config::new(ConfigKey::new("Host", "lan", "web"), Port { number: 80 });
        let err = expect_spec::<Host>(&config).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnexpectedPayload { ref expected, ref actual, .. }
                if expected == "net.Host" && actual == "net.Port"
        ));
        assert_eq!(
            expect_spec::<Port>(&config).expect("port"),
            &Port { number: 80 }
        );
    }
}
