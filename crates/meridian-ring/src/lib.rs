//! Consistent hashing ring for deterministic key-to-node assignment.
//!
//! This crate implements a consistent hash ring that maps arbitrary string
//! keys to a dynamic set of named nodes. Adding or removing a node only
//! reassigns the keys that fall into the arcs owned by that node's positions;
//! every other key keeps its owner.
//!
//! The ring uses virtual nodes (vnodes): each node gets `replica_factor`
//! positions on a `u32` ring, determined by [`hash_key`] of
//! `"<node_id>:<index>"`. More vnodes per node = more uniform distribution.
//!
//! ```
//! use meridian_ring::Ring;
//!
//! let ring = Ring::new(3);
//! ring.add_node("server1");
//! ring.add_node("server2");
//!
//! let owner = ring.get_node("user123").unwrap();
//! assert!(owner == "server1" || owner == "server2");
//! ```

mod hash;
mod ring;
mod snapshot;

#[cfg(test)]
mod tests;

pub use hash::{hash_key, vnode_key};
pub use ring::{Node, Ring};
pub use snapshot::{Reassignment, Snapshot};
