//! Render and distribute pipeline for Meridian.
//!
//! Generators turn registry contents into rendered outputs; consumers own a
//! set of generators and push what they render to a destination. The
//! `Pipeline` drives registry -> generators -> consumers.

pub mod consumer;
pub mod error;
pub mod file;
pub mod generator;
pub mod pipeline;

/// Consumer contract.
pub use consumer::Consumer;
/// Error types for rendering, distribution, and pipeline runs.
pub use error::{DistributionError, PipelineError, RenderError};
/// File-backed consumer.
pub use file::FileConsumer;
/// Generator contract and payload helpers.
pub use generator::{Generator, expect_spec, require_config};
/// Pipeline driver.
pub use pipeline::{Pipeline, SyncReport, render_consumer};
