//! Verification engine — metric lifecycle from submission to quorum seal.
//!
//! Every public operation is all-or-nothing: the verdict (including the
//! anomaly check) is computed before any state is touched, so a failing
//! call leaves the engine, the attestation log, and the verifier's
//! reputation exactly as they were.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use veris_directory::{NodeDirectory, VerifierDirectory};
use veris_types::{Address, Height, MetricId, NodeId, ProtocolParams, Timestamp};

use crate::anomaly;
use crate::attestation::Attestation;
use crate::error::VerificationError;
use crate::metric::{Metric, MetricKey};
use crate::snapshot::{SnapshotLog, VerifiedSnapshot};

/// Result of a successful attestation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttestationAccepted {
    /// Quorum counter after this attestation.
    pub verification_count: u32,
    /// Whether this attestation sealed the metric.
    pub sealed: bool,
    /// The attesting verifier's reputation after the agreement reward.
    pub reputation: u8,
}

/// The metric verification state machine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VerificationEngine {
    metrics: HashMap<MetricKey, Metric>,
    /// Attestations per metric key, at most one per verifier.
    attestations: HashMap<MetricKey, HashMap<Address, Attestation>>,
    snapshots: SnapshotLog,
}

impl VerificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a metric value for a node the caller owns.
    ///
    /// Re-submission under the same `(node, metric)` key overwrites the
    /// pending record and resets the quorum counter; attestations already
    /// logged for the key remain and still block their verifiers from
    /// attesting again.
    pub fn submit_metric(
        &mut self,
        nodes: &NodeDirectory,
        node_id: NodeId,
        metric_id: MetricId,
        reporter: &Address,
        value: u128,
        now: Timestamp,
        height: Height,
    ) -> Result<(), VerificationError> {
        let record = nodes
            .get(&node_id)
            .ok_or_else(|| VerificationError::UnknownNode(node_id.to_string()))?;
        if &record.owner != reporter {
            return Err(VerificationError::NotOwner {
                node: node_id.to_string(),
                caller: reporter.to_string(),
            });
        }
        if !record.active {
            return Err(VerificationError::NodeInactive(node_id.to_string()));
        }

        let key = MetricKey::new(node_id, metric_id);
        self.metrics.insert(
            key.clone(),
            Metric::pending(key, reporter.clone(), value, now, height),
        );
        Ok(())
    }

    /// Attest a pending metric with an independently observed value.
    ///
    /// The anomaly verdict is computed before anything is written. An
    /// anomalous observation fails the call with [`VerificationError::AnomalyDetected`]
    /// and persists nothing — no attestation record, no reputation change,
    /// no counter movement. A non-anomalous observation is logged, rewards
    /// the verifier's reputation, and advances the quorum counter; the
    /// attestation that reaches the quorum threshold seals the metric and
    /// appends an immutable snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_metric(
        &mut self,
        verifiers: &mut VerifierDirectory,
        node_id: &NodeId,
        metric_id: &MetricId,
        verifier: &Address,
        observed_value: u128,
        now: Timestamp,
        height: Height,
        params: &ProtocolParams,
    ) -> Result<AttestationAccepted, VerificationError> {
        let caller = verifiers
            .get(verifier)
            .ok_or_else(|| VerificationError::VerifierNotRegistered(verifier.to_string()))?;
        if !caller.active {
            return Err(VerificationError::VerifierInactive(verifier.to_string()));
        }

        let key = MetricKey::new(node_id.clone(), metric_id.clone());
        let metric = self
            .metrics
            .get_mut(&key)
            .ok_or_else(|| VerificationError::MetricNotFound {
                node: node_id.to_string(),
                metric: metric_id.to_string(),
            })?;

        if metric.verified {
            return Err(VerificationError::AlreadyVerified {
                node: node_id.to_string(),
                metric: metric_id.to_string(),
            });
        }
        if metric.is_expired(height, params.metric_expiry_window) {
            return Err(VerificationError::MetricExpired {
                submitted: metric.submitted_height.as_u64(),
                current: height.as_u64(),
            });
        }
        if self
            .attestations
            .get(&key)
            .is_some_and(|per_metric| per_metric.contains_key(verifier))
        {
            return Err(VerificationError::DuplicateAttestation(verifier.to_string()));
        }

        let verdict = anomaly::assess(metric.value, observed_value, params.anomaly_deviation_pct);
        if verdict.is_anomalous {
            // Whole-call failure: nothing above has mutated state, and
            // nothing below runs.
            return Err(VerificationError::AnomalyDetected {
                deviation: verdict.deviation,
                threshold: verdict.threshold,
            });
        }

        // Verdict reached — commit the staged effects.
        let reputation = verifiers.adjust_reputation(verifier, false, params)?;
        self.attestations.entry(key.clone()).or_default().insert(
            verifier.clone(),
            Attestation {
                verifier: verifier.clone(),
                value: observed_value,
                submitted_at: now,
                height,
            },
        );

        metric.verification_count += 1;
        let verification_count = metric.verification_count;
        let sealed = verification_count >= params.quorum_threshold;
        if sealed {
            metric.verified = true;
            let value = metric.value;
            self.snapshots.append(VerifiedSnapshot {
                key,
                value,
                verification_count,
                timestamp: now,
                sealed_height: height,
            });
        }

        Ok(AttestationAccepted {
            verification_count,
            sealed,
            reputation,
        })
    }

    // ── Read-only queries ───────────────────────────────────────────────

    pub fn get_metric(&self, node_id: &NodeId, metric_id: &MetricId) -> Option<&Metric> {
        self.metrics
            .get(&MetricKey::new(node_id.clone(), metric_id.clone()))
    }

    pub fn get_attestation(
        &self,
        node_id: &NodeId,
        metric_id: &MetricId,
        verifier: &Address,
    ) -> Option<&Attestation> {
        self.attestations
            .get(&MetricKey::new(node_id.clone(), metric_id.clone()))
            .and_then(|per_metric| per_metric.get(verifier))
    }

    /// Number of persisted attestations for a metric (equals the quorum
    /// counter for the current submission unless the metric was re-submitted).
    pub fn attestation_count(&self, node_id: &NodeId, metric_id: &MetricId) -> usize {
        self.attestations
            .get(&MetricKey::new(node_id.clone(), metric_id.clone()))
            .map_or(0, |per_metric| per_metric.len())
    }

    pub fn snapshots(&self) -> &SnapshotLog {
        &self.snapshots
    }
}
