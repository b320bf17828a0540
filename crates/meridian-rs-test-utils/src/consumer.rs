use async_trait::async_trait;
use meridian_rs_core::{Consumer, DistributionError, Generator};
use meridian_rs_protocol::ConfigOutput;
use parking_lot::Mutex;
use std::sync::Arc;

/// Consumer that records every batch it is asked to distribute.
#[derive(Clone)]
pub struct MockConsumer {
    name: String,
    generators: Vec<Arc<dyn Generator>>,
    rejection: Option<String>,
    received: Arc<Mutex<Vec<Vec<ConfigOutput>>>>,
}

impl MockConsumer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generators: Vec::new(),
            rejection: None,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generators.push(generator);
        self
    }

    /// Fail every distribution with `DistributionError::Rejected(message)`.
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.rejection = Some(message.into());
        self
    }

    /// Batches distributed so far, oldest first.
    pub fn received(&self) -> Vec<Vec<ConfigOutput>> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl Consumer for MockConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    fn generators(&self) -> Vec<Arc<dyn Generator>> {
        self.generators.clone()
    }

    async fn distribute(&self, outputs: &[ConfigOutput]) -> Result<(), DistributionError> {
        if let Some(message) = &self.rejection {
            return Err(DistributionError::Rejected(message.clone()));
        }
        self.received.lock().push(outputs.to_vec());
        Ok(())
    }
}
