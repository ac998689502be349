//! Per-verifier attestation records.

use serde::{Deserialize, Serialize};
use veris_types::{Address, Height, Timestamp};

/// One verifier's recorded observation of a metric.
///
/// At most one attestation exists per `(metric, verifier)` pair; a second
/// attempt by the same verifier is rejected. Only non-anomalous attestations
/// are ever persisted — an anomalous call fails whole and leaves no record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attestation {
    pub verifier: Address,
    /// The value the verifier observed independently.
    pub value: u128,
    pub submitted_at: Timestamp,
    pub height: Height,
}
