//! Protocol parameters — the governance-tunable values every engine consumes.
//!
//! In a complete deployment these are set by the governance module; the node
//! facade exposes admin-gated mutation for the subset the protocol currently
//! allows to change at runtime (the quorum threshold).

use serde::{Deserialize, Serialize};

/// All protocol parameters shared by the verification and reward engines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    // ── Verification ─────────────────────────────────────────────────────
    /// Number of independent non-anomalous attestations required to seal a
    /// metric as verified.
    pub quorum_threshold: u32,

    /// Maximum allowed deviation between the reported value and a
    /// verifier's observation, as a percentage of the reported value.
    /// Deviations strictly above this are anomalous.
    pub anomaly_deviation_pct: u128,

    /// Blocks after submission during which a metric accepts attestations.
    /// At `submitted_height + metric_expiry_window` the metric is expired.
    pub metric_expiry_window: u64,

    // ── Reputation ───────────────────────────────────────────────────────
    /// Reputation assigned to a verifier on registration (neutral prior).
    pub initial_reputation: u8,

    /// Reputation deducted for an anomalous attestation (floors at 0).
    /// Larger than the reward: false reports cost more than correct ones
    /// earn.
    pub reputation_penalty: u8,

    /// Reputation granted for an agreeing attestation (caps at 100).
    pub reputation_reward: u8,

    // ── Epochs & rewards ─────────────────────────────────────────────────
    /// Blocks per observation epoch (`epoch = height / epoch_length`).
    pub epoch_length: u64,

    /// Observation count at which a verifier reaches full activity credit
    /// in the reward formula.
    pub min_verifications: u64,

    /// Weight of the uptime score in the node performance score.
    pub uptime_weight: u64,

    /// Weight of the community rating in the node performance score.
    pub rating_weight: u64,

    /// Community rating assigned to a node before any admin rating.
    pub default_community_rating: u64,

    /// Dividend for the inverse response-time score
    /// (`score = response_score_dividend / response_time`).
    pub response_score_dividend: u64,
}

impl ProtocolParams {
    /// Veris mainnet defaults.
    pub fn defaults() -> Self {
        Self {
            quorum_threshold: 3,
            anomaly_deviation_pct: 20,
            metric_expiry_window: 144, // ~1 day of blocks

            initial_reputation: 50,
            reputation_penalty: 5,
            reputation_reward: 2,

            epoch_length: 144,
            min_verifications: 5,
            uptime_weight: 70,
            rating_weight: 30,
            default_community_rating: 50,
            response_score_dividend: 10_000,
        }
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::defaults()
    }
}
