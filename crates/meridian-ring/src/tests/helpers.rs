//! Shared fixtures for ring tests.

use crate::Ring;

/// Build a ring with the given replica factor and nodes, added in order.
pub(super) fn ring_with(replica_factor: u32, nodes: &[&str]) -> Ring {
    let ring = Ring::new(replica_factor);
    for node in nodes {
        ring.add_node(*node);
    }
    ring
}

/// Deterministic synthetic key sample: `key-0`, `key-1`, ...
pub(super) fn sample_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i}")).collect()
}
