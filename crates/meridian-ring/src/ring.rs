//! Consistent hashing ring implementation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::RwLock;

use tracing::{debug, trace};

use crate::hash::{hash_key, vnode_key};
use crate::snapshot::Snapshot;

/// A node registered on the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Opaque unique identifier.
    pub id: String,
    /// Number of vnodes placed for this node when it was added.
    pub replicas: u32,
}

/// Ring contents guarded as one unit.
#[derive(Debug, Default)]
struct RingState {
    /// Virtual node positions: ring position -> owning node ID.
    ///
    /// Doubles as the sorted index for the successor search.
    vnodes: BTreeMap<u32, String>,
    /// Registered nodes, keyed by ID.
    nodes: HashMap<String, Node>,
}

impl RingState {
    fn owner(&self, hash: u32) -> Option<&String> {
        // First position >= hash, wrapping around to the lowest one.
        self.vnodes
            .range(hash..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(_, node_id)| node_id)
    }
}

/// Consistent hashing ring mapping string keys to node IDs.
///
/// Each node is mapped to `replica_factor` virtual nodes (vnodes) on a u32
/// ring. A key belongs to the owner of the first vnode at or after the key's
/// hash, wrapping past `u32::MAX` back to the lowest vnode.
///
/// All methods take `&self`; a single reader/writer lock covers the vnode
/// map and the node registry, so a `Ring` can be shared across threads
/// (e.g. behind an `Arc`). Mutations are serialized, lookups run in parallel.
#[derive(Debug)]
pub struct Ring {
    state: RwLock<RingState>,
    replica_factor: u32,
}

impl Ring {
    /// Create a new empty ring placing `replica_factor` vnodes per node.
    ///
    /// A factor of 0 is accepted: nodes are still registered, but they never
    /// occupy a position, so every lookup returns `None`.
    pub fn new(replica_factor: u32) -> Self {
        Self {
            state: RwLock::new(RingState::default()),
            replica_factor,
        }
    }

    /// Add a node to the ring.
    ///
    /// Adding a node that is already registered is a no-op. If one of the
    /// new vnodes hashes onto an occupied position, the new node takes it
    /// over and the previous owner loses that vnode.
    pub fn add_node(&self, node_id: impl Into<String>) {
        let node_id = node_id.into();
        let mut state = self.state.write().expect("lock poisoned");

        if state.nodes.contains_key(&node_id) {
            trace!(%node_id, "node already on ring");
            return;
        }

        for i in 0..self.replica_factor {
            let pos = hash_key(&vnode_key(&node_id, i));
            if let Some(previous) = state.vnodes.insert(pos, node_id.clone()) {
                debug!(%node_id, %previous, pos, "vnode position collision, overwriting");
            }
        }

        state.nodes.insert(
            node_id.clone(),
            Node {
                id: node_id.clone(),
                replicas: self.replica_factor,
            },
        );
        debug!(
            %node_id,
            replicas = self.replica_factor,
            vnodes = state.vnodes.len(),
            "added node to ring"
        );
    }

    /// Remove a node and all vnodes it currently owns.
    ///
    /// Removing an unknown node is a no-op. Positions are matched by owner,
    /// so a vnode that was overwritten by another node stays with that node.
    pub fn remove_node(&self, node_id: &str) {
        let mut state = self.state.write().expect("lock poisoned");

        if state.nodes.remove(node_id).is_none() {
            trace!(%node_id, "node not on ring");
            return;
        }

        state.vnodes.retain(|_, owner| owner.as_str() != node_id);
        debug!(%node_id, vnodes = state.vnodes.len(), "removed node from ring");
    }

    /// Return the node that owns `key`, or `None` if the ring has no vnodes.
    pub fn get_node(&self, key: &str) -> Option<String> {
        let state = self.state.read().expect("lock poisoned");
        state.owner(hash_key(key)).cloned()
    }

    /// Return every occupied position and its owner, ascending by position.
    pub fn positions(&self) -> Vec<(u32, String)> {
        let state = self.state.read().expect("lock poisoned");
        state
            .vnodes
            .iter()
            .map(|(pos, node_id)| (*pos, node_id.clone()))
            .collect()
    }

    /// Record the current owner of each key under a single read lock.
    pub fn snapshot<I, K>(&self, keys: I) -> Snapshot
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let state = self.state.read().expect("lock poisoned");
        keys.into_iter()
            .map(|key| {
                let key = key.into();
                let owner = state.owner(hash_key(&key)).cloned();
                (key, owner)
            })
            .collect()
    }

    /// Return the configured number of vnodes per node.
    pub fn replica_factor(&self) -> u32 {
        self.replica_factor
    }

    /// Return the number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.state.read().expect("lock poisoned").nodes.len()
    }

    /// Return the total number of occupied positions.
    pub fn position_count(&self) -> usize {
        self.state.read().expect("lock poisoned").vnodes.len()
    }

    /// Whether the ring has no occupied positions.
    pub fn is_empty(&self) -> bool {
        self.state.read().expect("lock poisoned").vnodes.is_empty()
    }

    /// Whether `node_id` is registered.
    pub fn contains_node(&self, node_id: &str) -> bool {
        self.state
            .read()
            .expect("lock poisoned")
            .nodes
            .contains_key(node_id)
    }

    /// Return the registry record for a node, if present.
    pub fn node(&self, node_id: &str) -> Option<Node> {
        self.state
            .read()
            .expect("lock poisoned")
            .nodes
            .get(node_id)
            .cloned()
    }

    /// Return all registered node IDs, sorted.
    pub fn node_ids(&self) -> Vec<String> {
        let state = self.state.read().expect("lock poisoned");
        let mut ids: Vec<String> = state.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().map_err(|_| fmt::Error)?;
        writeln!(f, "Consistent Hash Ring Distribution:")?;
        for (pos, node_id) in &state.vnodes {
            writeln!(f, "Hash: {pos} -> Node: {node_id}")?;
        }
        Ok(())
    }
}
