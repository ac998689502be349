//! Pending metric records and their composite identity.

use serde::{Deserialize, Serialize};
use veris_types::{Address, Height, MetricId, NodeId, Timestamp};

/// Composite identity of a metric: the node it describes plus the series id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    pub node: NodeId,
    pub metric: MetricId,
}

impl MetricKey {
    pub fn new(node: NodeId, metric: MetricId) -> Self {
        Self { node, metric }
    }
}

/// A metric value reported by a node owner, pending (or sealed by) quorum.
///
/// Re-submission under the same key overwrites the pending record and resets
/// the quorum counter. `verified` is a one-way latch: once true it never
/// reverts, and further attestations are rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metric {
    pub key: MetricKey,
    /// The node owner that reported the value.
    pub reporter: Address,
    pub value: u128,
    pub submitted_at: Timestamp,
    pub submitted_height: Height,
    pub verified: bool,
    /// Non-anomalous attestations accumulated so far.
    pub verification_count: u32,
}

impl Metric {
    /// A fresh pending record for a newly submitted value.
    pub fn pending(
        key: MetricKey,
        reporter: Address,
        value: u128,
        submitted_at: Timestamp,
        submitted_height: Height,
    ) -> Self {
        Self {
            key,
            reporter,
            value,
            submitted_at,
            submitted_height,
            verified: false,
            verification_count: 0,
        }
    }

    /// Whether the metric no longer accepts attestations at `height`.
    pub fn is_expired(&self, height: Height, expiry_window: u64) -> bool {
        height.blocks_since(self.submitted_height) >= expiry_window
    }
}
