//! Test helpers shared across Meridian crates.

pub mod consumer;
pub mod generator;
pub mod invariant;
pub mod mocks;

pub use consumer::MockConsumer;
pub use generator::{FailingGenerator, MockGenerator};
pub use invariant::check_map_invariant;
pub use mocks::{
    ConfigPair, MOCK_KIND, MOCK_NAME, MOCK_NAMESPACE, MockConfig, MockConfigStatus, mock_catalog,
    mock_config, mock_key, mock_object,
};
