//! Multi-party metric verification.
//!
//! Node operators submit metric values about infrastructure they own;
//! independent verifiers attest with their own observations. Attestations
//! within the anomaly tolerance count toward a quorum; the attestation that
//! reaches quorum seals the metric and writes an immutable snapshot.
//! Anomalous attestations fail the whole call — nothing they would have
//! written survives.

pub mod anomaly;
pub mod attestation;
pub mod engine;
pub mod error;
pub mod metric;
pub mod snapshot;

pub use anomaly::{assess, AnomalyVerdict};
pub use attestation::Attestation;
pub use engine::{AttestationAccepted, VerificationEngine};
pub use error::VerificationError;
pub use metric::{Metric, MetricKey};
pub use snapshot::{SnapshotLog, VerifiedSnapshot};
