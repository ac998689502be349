//! Performance observations, node scores, and the apportionment arithmetic.
//!
//! All formulas are integer-exact with floor division; no fractional
//! remainder is carried forward.

use serde::{Deserialize, Serialize};
use veris_types::{Address, ProtocolParams};

/// An unverified per-epoch performance observation about a node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceObservation {
    pub epoch: u64,
    /// Observed uptime percentage in `[0, 100]`.
    pub uptime: u64,
    /// Observed average response time, strictly positive.
    pub response_time: u64,
    /// The verifier that submitted the observation.
    pub reporter: Address,
    /// Set once the admin confirms the observation.
    pub verified: bool,
}

/// A node's current reward-relevant scores.
///
/// `uptime_score` and `response_time_score` are frozen from the most
/// recently confirmed observation; `community_rating` is an admin-set
/// input defaulting to the neutral value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeScore {
    pub uptime_score: u64,
    pub response_time_score: u64,
    pub community_rating: u64,
    /// Whether any observation has been confirmed for this node.
    /// The node earns a pool share only once this is set.
    pub performance_verified: bool,
}

impl NodeScore {
    /// Score state for a node with no confirmed observation yet.
    pub fn unrated(params: &ProtocolParams) -> Self {
        Self {
            uptime_score: 0,
            response_time_score: 0,
            community_rating: params.default_community_rating,
            performance_verified: false,
        }
    }
}

/// Inverse response-time score: lower latency yields a higher score.
/// The zero guard mirrors the upstream formula even though submission
/// validation rejects a zero response time.
pub fn response_time_score(response_time: u64, params: &ProtocolParams) -> u64 {
    if response_time == 0 {
        100
    } else {
        params.response_score_dividend / response_time
    }
}

/// Weighted node performance score: `uptime * 70 + rating * 30` at default
/// weights, giving a maximum of 10 000.
pub fn node_performance_score(uptime_score: u64, community_rating: u64, params: &ProtocolParams) -> u64 {
    uptime_score * params.uptime_weight + community_rating * params.rating_weight
}

/// A node's whole-percent share of the node pool.
pub fn node_share_pct(performance_score: u64, params: &ProtocolParams) -> u64 {
    let denom = (params.uptime_weight + params.rating_weight) * 100;
    performance_score * 100 / denom
}

/// The node-pool payout for a share percentage.
pub fn node_reward(node_pool: u128, share_pct: u64) -> u128 {
    node_pool * share_pct as u128 / 100
}

/// Whole-percent accuracy: `correct * 100 / total`, 0 when nothing was
/// submitted.
pub fn accuracy_pct(correct_count: u64, total_count: u64) -> u64 {
    if total_count == 0 {
        0
    } else {
        correct_count * 100 / total_count
    }
}

/// Whole-percent activity credit, saturating at 100 once the verifier has
/// submitted `min_verifications` observations.
pub fn activity_pct(total_count: u64, params: &ProtocolParams) -> u64 {
    if params.min_verifications == 0 {
        return 100;
    }
    (total_count * 100 / params.min_verifications).min(100)
}

/// A verifier's whole-percent share of the verifier pool.
pub fn verifier_share_pct(accuracy_pct: u64, activity_pct: u64) -> u64 {
    accuracy_pct * activity_pct / 10_000
}

/// The verifier-pool payout for a share percentage.
pub fn verifier_reward(verifier_pool: u128, share_pct: u64) -> u128 {
    verifier_pool * share_pct as u128 / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ProtocolParams {
        ProtocolParams::defaults()
    }

    #[test]
    fn documented_determinism_case() {
        // uptime 80, rating 50, pool 1000 → share 71, reward 710.
        let score = node_performance_score(80, 50, &params());
        assert_eq!(score, 80 * 70 + 50 * 30);
        let share = node_share_pct(score, &params());
        assert_eq!(share, 71);
        assert_eq!(node_reward(1000, share), 710);
    }

    #[test]
    fn perfect_node_takes_full_share() {
        let score = node_performance_score(100, 100, &params());
        assert_eq!(node_share_pct(score, &params()), 100);
        assert_eq!(node_reward(5000, 100), 5000);
    }

    #[test]
    fn response_score_scales_inversely() {
        let p = params();
        assert_eq!(response_time_score(100, &p), 100);
        assert_eq!(response_time_score(50, &p), 200);
        assert_eq!(response_time_score(10_000, &p), 1);
        // Floor division: anything slower than the dividend scores 0.
        assert_eq!(response_time_score(10_001, &p), 0);
        // Upstream zero guard.
        assert_eq!(response_time_score(0, &p), 100);
    }

    #[test]
    fn accuracy_zero_when_no_submissions() {
        assert_eq!(accuracy_pct(0, 0), 0);
        assert_eq!(accuracy_pct(3, 4), 75);
        assert_eq!(accuracy_pct(1, 3), 33); // floor
    }

    #[test]
    fn activity_saturates_at_min_verifications() {
        let p = params();
        assert_eq!(activity_pct(0, &p), 0);
        assert_eq!(activity_pct(2, &p), 40);
        assert_eq!(activity_pct(5, &p), 100);
        assert_eq!(activity_pct(500, &p), 100);
    }

    #[test]
    fn verifier_share_compounds_accuracy_and_activity() {
        // Floor division: the accuracy x activity product must reach the
        // 10_000 divisor before any share materializes, so only a perfect
        // pairing earns the unit share.
        assert_eq!(verifier_share_pct(100, 100), 1);
        assert_eq!(verifier_share_pct(100, 99), 0);
        assert_eq!(verifier_share_pct(80, 100), 0);
        assert_eq!(verifier_share_pct(33, 40), 0);
        assert_eq!(verifier_reward(1000, 1), 10);
        assert_eq!(verifier_reward(1000, 0), 0);
    }
}
