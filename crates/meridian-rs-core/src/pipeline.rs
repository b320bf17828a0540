//! Pipeline driver: registry -> generators -> consumers.

use crate::consumer::Consumer;
use crate::error::PipelineError;
use log::{debug, info, warn};
use meridian_rs_config::MeridianConfig;
use meridian_rs_protocol::ConfigOutput;
use meridian_rs_registry::{MemoryRegistry, Registry, load_sources};
use meridian_rs_schema::SchemaCatalog;
use std::path::Path;
use std::sync::Arc;

/// Render every generator of `consumer` against `registry`.
///
/// Outputs are concatenated in generator order; the first failing generator
/// aborts the render.
pub fn render_consumer(
    consumer: &dyn Consumer,
    registry: &dyn Registry,
) -> Result<Vec<ConfigOutput>, PipelineError> {
    let mut outputs = Vec::new();
    for generator in consumer.generators() {
        let rendered = generator
            .render(registry)
            .map_err(|source| PipelineError::Render {
                consumer: consumer.name().to_string(),
                generator: generator.name().to_string(),
                source,
            })?;
        debug!(
            "rendered generator (consumer={}, generator={}, outputs={})",
            consumer.name(),
            generator.name(),
            rendered.len()
        );
        outputs.extend(rendered);
    }
    Ok(outputs)
}

/// Summary of one consumer sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Consumer that was synced.
    pub consumer: String,
    /// Number of outputs distributed.
    pub outputs: usize,
    /// Number of source keys across those outputs.
    pub sources: usize,
}

/// Registry plus the consumers fed from it.
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<dyn Registry>,
    consumers: Vec<Arc<dyn Consumer>>,
}

impl Pipeline {
    /// Create a pipeline with no consumers.
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            consumers: Vec::new(),
        }
    }

    /// Build an in-memory registry from settings and load the configured sources.
    ///
    /// Relative source paths are resolved against `base`.
    pub fn bootstrap(
        config: &MeridianConfig,
        base: &Path,
        catalog: Arc<SchemaCatalog>,
    ) -> Result<Self, PipelineError> {
        let registry = MemoryRegistry::new(catalog.clone());
        let paths = config.resolve_source_paths(base);
        let loaded = load_sources(
            &registry,
            &catalog,
            &paths,
            config.sources.namespace.as_deref(),
        )?;
        info!(
            "bootstrapped pipeline registry (sources={}, configs={})",
            paths.len(),
            loaded
        );
        Ok(Self::new(Arc::new(registry)))
    }

    /// Register a consumer; names must be unique.
    pub fn add_consumer(&mut self, consumer: Arc<dyn Consumer>) -> Result<(), PipelineError> {
        if self.find(consumer.name()).is_some() {
            return Err(PipelineError::DuplicateConsumer(consumer.name().to_string()));
        }
        debug!("registering consumer (name={})", consumer.name());
        self.consumers.push(consumer);
        Ok(())
    }

    /// Builder-style `add_consumer`.
    pub fn with_consumer(mut self, consumer: Arc<dyn Consumer>) -> Result<Self, PipelineError> {
        self.add_consumer(consumer)?;
        Ok(self)
    }

    /// Registry backing this pipeline.
    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Names of registered consumers, in registration order.
    pub fn consumer_names(&self) -> Vec<&str> {
        self.consumers
            .iter()
            .map(|consumer| consumer.name())
            .collect()
    }

    /// Render and distribute for a single consumer.
    pub async fn sync_consumer(&self, name: &str) -> Result<SyncReport, PipelineError> {
        let consumer = self
            .find(name)
            .ok_or_else(|| PipelineError::UnknownConsumer(name.to_string()))?;
        sync_one(consumer.as_ref(), self.registry.as_ref()).await
    }

    /// Sync every consumer in registration order, stopping at the first error.
    pub async fn sync(&self) -> Result<Vec<SyncReport>, PipelineError> {
        let mut reports = Vec::with_capacity(self.consumers.len());
        for consumer in &self.consumers {
            reports.push(sync_one(consumer.as_ref(), self.registry.as_ref()).await?);
        }
        info!("pipeline sync complete (consumers={})", reports.len());
        Ok(reports)
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Consumer>> {
        self.consumers
            .iter()
            .find(|consumer| consumer.name() == name)
    }
}

async fn sync_one(
    consumer: &dyn Consumer,
    registry: &dyn Registry,
) -> Result<SyncReport, PipelineError> {
    let outputs = render_consumer(consumer, registry)?;
    if let Err(source) = consumer.distribute(&outputs).await {
        warn!(
            "distribution failed (consumer={}, error={})",
            consumer.name(),
            source
        );
        return Err(PipelineError::Distribution {
            consumer: consumer.name().to_string(),
            source,
        });
    }
    let report = SyncReport {
        consumer: consumer.name().to_string(),
        outputs: outputs.len(),
        sources: outputs.iter().map(|output| output.sources.len()).sum(),
    };
    debug!(
        "synced consumer (name={}, outputs={}, sources={})",
        report.consumer, report.outputs, report.sources
    );
    Ok(report)
}
