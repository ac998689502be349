//! Append-only log of sealed metrics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use veris_types::{Height, Timestamp};

use crate::metric::MetricKey;

/// Immutable historical copy of a metric, written once at the moment quorum
/// was reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSnapshot {
    pub key: MetricKey,
    pub value: u128,
    pub verification_count: u32,
    pub timestamp: Timestamp,
    /// The height at which the sealing attestation landed.
    pub sealed_height: Height,
}

/// Arena-style snapshot log keyed by `(metric key, sealed height)`.
///
/// Entries are appended at seal time and never mutated or removed. If the
/// same key is sealed twice at the same height (a re-submitted metric sealed
/// within one block), the first entry wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotLog {
    entries: Vec<VerifiedSnapshot>,
    index: HashMap<(MetricKey, Height), usize>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot. Returns false (and keeps the existing entry) if
    /// one already exists for this key and height.
    pub fn append(&mut self, snapshot: VerifiedSnapshot) -> bool {
        let index_key = (snapshot.key.clone(), snapshot.sealed_height);
        if self.index.contains_key(&index_key) {
            return false;
        }
        self.index.insert(index_key, self.entries.len());
        self.entries.push(snapshot);
        true
    }

    pub fn get(&self, key: &MetricKey, sealed_height: Height) -> Option<&VerifiedSnapshot> {
        self.index
            .get(&(key.clone(), sealed_height))
            .map(|&i| &self.entries[i])
    }

    /// All snapshots for a metric key, in seal order.
    pub fn history(&self, key: &MetricKey) -> Vec<&VerifiedSnapshot> {
        self.entries.iter().filter(|s| &s.key == key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerifiedSnapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_types::{MetricId, NodeId};

    fn key(n: &str) -> MetricKey {
        MetricKey::new(NodeId::new(n), MetricId::new("uptime"))
    }

    fn snap(n: &str, height: u64, value: u128) -> VerifiedSnapshot {
        VerifiedSnapshot {
            key: key(n),
            value,
            verification_count: 3,
            timestamp: Timestamp::new(9),
            sealed_height: Height::new(height),
        }
    }

    #[test]
    fn append_and_lookup() {
        let mut log = SnapshotLog::new();
        assert!(log.append(snap("n1", 10, 100)));
        assert_eq!(log.len(), 1);

        let got = log.get(&key("n1"), Height::new(10)).unwrap();
        assert_eq!(got.value, 100);
        assert_eq!(got.verification_count, 3);
    }

    #[test]
    fn duplicate_key_keeps_first_entry() {
        let mut log = SnapshotLog::new();
        assert!(log.append(snap("n1", 10, 100)));
        assert!(!log.append(snap("n1", 10, 999)));

        assert_eq!(log.len(), 1);
        assert_eq!(log.get(&key("n1"), Height::new(10)).unwrap().value, 100);
    }

    #[test]
    fn history_is_in_seal_order() {
        let mut log = SnapshotLog::new();
        log.append(snap("n1", 10, 100));
        log.append(snap("n2", 11, 50));
        log.append(snap("n1", 200, 120));

        let history: Vec<u128> = log.history(&key("n1")).iter().map(|s| s.value).collect();
        assert_eq!(history, vec![100, 120]);
    }
}
