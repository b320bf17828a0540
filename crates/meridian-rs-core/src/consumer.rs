//! Consumer contract: own generators and distribute what they render.

use crate::error::DistributionError;
use crate::generator::Generator;
use async_trait::async_trait;
use meridian_rs_protocol::ConfigOutput;
use std::sync::Arc;

#[async_trait]
/// Destination for rendered outputs.
///
/// A consumer names the generators whose outputs it receives; the pipeline
/// renders them in the order returned by `generators` and hands the
/// concatenated outputs to `distribute`.
pub trait Consumer: Send + Sync {
    /// Unique name of the consumer within a pipeline.
    fn name(&self) -> &str;

    /// Generators whose outputs this consumer distributes, in render order.
    fn generators(&self) -> Vec<Arc<dyn Generator>>;

    /// Deliver rendered outputs to the destination.
    async fn distribute(&self, outputs: &[ConfigOutput]) -> Result<(), DistributionError>;
}
