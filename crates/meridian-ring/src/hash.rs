//! Ring hash function and virtual-node key format.
//!
//! Both are fixed protocol details: every ring that needs to agree on key
//! ownership must compute positions exactly this way.

/// Hash a key onto the `u32` ring.
///
/// Takes the MD5 digest of the key's UTF-8 bytes and assembles its first
/// four bytes little-endian (byte 0 is the least significant).
pub fn hash_key(key: &str) -> u32 {
    let digest = md5::compute(key.as_bytes()).0;
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// The key hashed to place vnode `index` of `node_id`: `"<node_id>:<index>"`.
pub fn vnode_key(node_id: &str, index: u32) -> String {
    format!("{node_id}:{index}")
}
