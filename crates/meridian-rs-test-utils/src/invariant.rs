//! Conformance check any `Registry` backend must pass.

use crate::mocks::{MOCK_KIND, MOCK_NAME, mock_config};
use meridian_rs_protocol::ConfigKey;
use meridian_rs_registry::Registry;
use pretty_assertions::assert_eq;

/// Exercise put/get/list/delete with `n` mock configs in `namespace`.
///
/// Panics on the first violated expectation. The registry must accept the
/// mock kind and must not already hold mock configs in `namespace`.
pub fn check_map_invariant(registry: &dyn Registry, namespace: &str, n: usize) {
    let configs = (0..n)
        .map(|index| mock_config(namespace, index))
        .collect::<Vec<_>>();

    for config in &configs {
        if let Err(err) = registry.put(config.clone()) {
            panic!("put {} failed: {err}", config.key);
        }
    }

    for config in &configs {
        assert_eq!(registry.get(&config.key).as_ref(), Some(config));
    }

    let missing = ConfigKey::new(MOCK_KIND, namespace, MOCK_NAME);
    assert!(
        registry.get(&missing).is_none(),
        "unexpected config found at {missing}"
    );

    let listed = registry.list(MOCK_KIND, namespace);
    assert_eq!(listed.len(), n, "listed {listed:?}");

    for config in &configs {
        if let Err(err) = registry.delete(&config.key) {
            panic!("delete {} failed: {err}", config.key);
        }
    }

    let listed = registry.list(MOCK_KIND, namespace);
    assert!(listed.is_empty(), "listed {listed:?} after delete");
}
