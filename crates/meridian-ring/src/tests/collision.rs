//! Vnode hash collisions resolve last-write-wins.
//!
//! `node-38597:0` and `node-114912:0` share the same 32-bit position. The
//! later add takes the position over and the earlier node keeps no vnode
//! until it is removed and re-added.

use crate::{Ring, hash_key};

const FIRST: &str = "node-38597";
const SECOND: &str = "node-114912";
const SHARED_POSITION: u32 = 2_014_913_252;

#[test]
fn test_collision_pair_shares_position() {
    assert_eq!(hash_key("node-38597:0"), SHARED_POSITION);
    assert_eq!(hash_key("node-114912:0"), SHARED_POSITION);
}

#[test]
fn test_later_add_overwrites_position() {
    let ring = Ring::new(1);
    ring.add_node(FIRST);
    ring.add_node(SECOND);

    // Both nodes are registered but only one vnode survives.
    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.position_count(), 1);
    assert_eq!(ring.positions(), vec![(SHARED_POSITION, SECOND.to_string())]);
    assert_eq!(ring.get_node("user123").as_deref(), Some(SECOND));
}

#[test]
fn test_removing_overwritten_node_keeps_winner() {
    let ring = Ring::new(1);
    ring.add_node(FIRST);
    ring.add_node(SECOND);

    ring.remove_node(FIRST);
    assert_eq!(ring.position_count(), 1);
    assert_eq!(ring.get_node("user123").as_deref(), Some(SECOND));

    // The overwritten node regains its vnode only by being re-added.
    ring.add_node(FIRST);
    assert_eq!(ring.positions(), vec![(SHARED_POSITION, FIRST.to_string())]);
}

#[test]
fn test_removing_winner_leaves_loser_without_positions() {
    let ring = Ring::new(1);
    ring.add_node(FIRST);
    ring.add_node(SECOND);

    ring.remove_node(SECOND);
    assert!(ring.contains_node(FIRST));
    assert!(ring.is_empty());
    assert_eq!(ring.get_node("user123"), None);
}
