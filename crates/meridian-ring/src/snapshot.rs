//! Point-in-time key ownership, for measuring how membership changes move keys.

use std::collections::BTreeMap;

/// A key whose owner differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// The key that moved.
    pub key: String,
    /// Owner in the earlier snapshot (`None` if the ring was empty).
    pub from: Option<String>,
    /// Owner in the later snapshot (`None` if the ring is now empty).
    pub to: Option<String>,
}

/// Owner of each key in a sample at the moment [`Ring::snapshot`] was taken.
///
/// [`Ring::snapshot`]: crate::Ring::snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    owners: BTreeMap<String, Option<String>>,
}

impl Snapshot {
    /// Owner recorded for `key`.
    ///
    /// Returns `None` both for keys outside the sample and for keys that had
    /// no owner; use [`Snapshot::contains_key`] to tell them apart.
    pub fn owner(&self, key: &str) -> Option<&str> {
        self.owners.get(key).and_then(|o| o.as_deref())
    }

    /// Whether `key` was part of the sample.
    pub fn contains_key(&self, key: &str) -> bool {
        self.owners.contains_key(key)
    }

    /// Number of sampled keys.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the sample was empty.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Iterate `(key, owner)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.owners
            .iter()
            .map(|(key, owner)| (key.as_str(), owner.as_deref()))
    }

    /// Number of sampled keys owned by each node.
    ///
    /// Keys without an owner are not counted.
    pub fn load(&self) -> BTreeMap<String, usize> {
        let mut load = BTreeMap::new();
        for owner in self.owners.values().flatten() {
            *load.entry(owner.clone()).or_insert(0) += 1;
        }
        load
    }

    /// Keys sampled in both snapshots whose owner changed from `self` to `after`.
    pub fn reassignments(&self, after: &Snapshot) -> Vec<Reassignment> {
        self.owners
            .iter()
            .filter_map(|(key, from)| {
                let to = after.owners.get(key)?;
                (from != to).then(|| Reassignment {
                    key: key.clone(),
                    from: from.clone(),
                    to: to.clone(),
                })
            })
            .collect()
    }
}

impl FromIterator<(String, Option<String>)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self {
            owners: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, Option<&str>)]) -> Snapshot {
        pairs
            .iter()
            .map(|(k, o)| (k.to_string(), o.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_reassignments_only_changed_keys() {
        let before = snap(&[("a", Some("n1")), ("b", Some("n2")), ("c", Some("n1"))]);
        let after = snap(&[("a", Some("n1")), ("b", Some("n3")), ("c", Some("n1"))]);

        assert_eq!(
            before.reassignments(&after),
            vec![Reassignment {
                key: "b".to_string(),
                from: Some("n2".to_string()),
                to: Some("n3".to_string()),
            }]
        );
    }

    #[test]
    fn test_reassignments_ignore_keys_missing_from_after() {
        let before = snap(&[("a", Some("n1")), ("b", Some("n2"))]);
        let after = snap(&[("a", Some("n2"))]);

        let moved = before.reassignments(&after);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].key, "a");
    }

    #[test]
    fn test_reassignment_to_empty_ring() {
        let before = snap(&[("a", Some("n1"))]);
        let after = snap(&[("a", None)]);

        let moved = before.reassignments(&after);
        assert_eq!(moved[0].to, None);
    }

    #[test]
    fn test_load_skips_unowned_keys() {
        let s = snap(&[("a", Some("n1")), ("b", Some("n1")), ("c", Some("n2")), ("d", None)]);
        let load = s.load();
        assert_eq!(load.get("n1"), Some(&2));
        assert_eq!(load.get("n2"), Some(&1));
        assert_eq!(load.len(), 2);
    }

    #[test]
    fn test_owner_and_contains() {
        let s = snap(&[("a", Some("n1")), ("b", None)]);
        assert_eq!(s.owner("a"), Some("n1"));
        assert_eq!(s.owner("b"), None);
        assert!(s.contains_key("b"));
        assert!(!s.contains_key("z"));
        assert_eq!(s.len(), 2);
        assert!(!s.is_empty());
    }
}
