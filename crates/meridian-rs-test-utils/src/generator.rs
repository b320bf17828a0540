use crate::mocks::{MOCK_KIND, MockConfig};
use meridian_rs_core::{Generator, RenderError, expect_spec};
use meridian_rs_protocol::ConfigOutput;
use meridian_rs_registry::Registry;

/// Renders every mock config in all namespaces as `key: value` lines in a
/// single output whose sources are the listed keys.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator;

impl Generator for MockGenerator {
    fn name(&self) -> &str {
        "MockGenerator"
    }

    fn render(&self, registry: &dyn Registry) -> Result<Vec<ConfigOutput>, RenderError> {
        let mut content = String::new();
        let mut sources = Vec::new();
        for config in registry.list(MOCK_KIND, "") {
            let spec = expect_spec::<MockConfig>(&config)?;
            for pair in &spec.pairs {
                content.push_str(&pair.key);
                content.push_str(": ");
                content.push_str(&pair.value);
                content.push('\n');
            }
            sources.push(config.key.clone());
        }
        Ok(vec![ConfigOutput::new(sources, content)])
    }
}

#[derive(Debug, Clone)]
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "FailingGenerator"
    }

    fn render(&self, _registry: &dyn Registry) -> Result<Vec<ConfigOutput>, RenderError> {
        Err(RenderError::Failed(self.message.clone()))
    }
}
