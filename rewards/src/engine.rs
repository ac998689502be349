//! Reward engine — observation bookkeeping, pools, and the claim flow.
//!
//! Every mutating operation validates fully before touching state; a claim
//! in particular pre-computes both pool debits and applies them together
//! with the claim record, or not at all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use veris_directory::{NodeDirectory, VerifierDirectory};
use veris_types::{Address, Height, NodeId, ProtocolParams};

use crate::claim::ClaimRecord;
use crate::error::RewardError;
use crate::performance::{
    accuracy_pct, activity_pct, node_performance_score, node_reward, node_share_pct,
    response_time_score, verifier_reward, verifier_share_pct, NodeScore, PerformanceObservation,
};
use crate::pool::RewardPool;

/// Result of a successful claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub node_reward: u128,
    pub verifier_reward: u128,
}

impl ClaimOutcome {
    pub fn total(&self) -> u128 {
        self.node_reward + self.verifier_reward
    }
}

/// Read-only preview of what a claim would yield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardEstimate {
    pub node_reward: u128,
    pub verifier_reward: u128,
}

impl RewardEstimate {
    pub fn total(&self) -> u128 {
        self.node_reward + self.verifier_reward
    }
}

/// The epoch and reward apportionment state machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardEngine {
    observations: HashMap<(NodeId, u64), PerformanceObservation>,
    scores: HashMap<NodeId, NodeScore>,
    pools: HashMap<u64, RewardPool>,
    claims: HashMap<(Address, u64), ClaimRecord>,
    /// Admin-advanced payout boundary: only epochs strictly below it are
    /// claimable. Distinct from the height-derived observation epoch.
    payable_epoch: u64,
    distribution_enabled: bool,
}

impl Default for RewardEngine {
    fn default() -> Self {
        Self {
            observations: HashMap::new(),
            scores: HashMap::new(),
            pools: HashMap::new(),
            claims: HashMap::new(),
            payable_epoch: 0,
            distribution_enabled: true,
        }
    }
}

impl RewardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Epoch clocks ────────────────────────────────────────────────────

    /// The height-derived epoch used by the submission path.
    pub fn observation_epoch_at(&self, height: Height, params: &ProtocolParams) -> u64 {
        height.epoch_at(params.epoch_length)
    }

    /// The admin-advanced epoch used by the payout path.
    pub fn payable_epoch(&self) -> u64 {
        self.payable_epoch
    }

    /// Advance the payout boundary by one epoch. Returns the new boundary.
    pub fn advance_epoch(&mut self) -> u64 {
        self.payable_epoch += 1;
        self.payable_epoch
    }

    pub fn distribution_enabled(&self) -> bool {
        self.distribution_enabled
    }

    pub fn set_distribution_enabled(&mut self, enabled: bool) {
        self.distribution_enabled = enabled;
    }

    // ── Observations & scores ───────────────────────────────────────────

    /// Record a performance observation about `node_id` for the epoch the
    /// given height falls in, and count it toward the reporter's activity.
    /// Returns the observation epoch.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_node_performance(
        &mut self,
        nodes: &NodeDirectory,
        verifiers: &mut VerifierDirectory,
        reporter: &Address,
        node_id: &NodeId,
        uptime: u64,
        response_time: u64,
        height: Height,
        params: &ProtocolParams,
    ) -> Result<u64, RewardError> {
        if !verifiers.is_active(reporter) {
            return Err(RewardError::NotAuthorized(reporter.to_string()));
        }
        if !nodes.is_registered(node_id) {
            return Err(RewardError::InvalidNode(node_id.to_string()));
        }
        if uptime > 100 {
            return Err(RewardError::InvalidAmount {
                field: "uptime",
                value: uptime,
            });
        }
        if response_time == 0 {
            return Err(RewardError::InvalidAmount {
                field: "response time",
                value: response_time,
            });
        }

        let epoch = self.observation_epoch_at(height, params);
        verifiers.record_submission(reporter)?;
        self.observations.insert(
            (node_id.clone(), epoch),
            PerformanceObservation {
                epoch,
                uptime,
                response_time,
                reporter: reporter.clone(),
                verified: false,
            },
        );
        Ok(epoch)
    }

    /// Admin confirmation of a recorded observation. On `verified = true`
    /// the node's scores are frozen from the observation: the uptime score
    /// directly, the response-time score inversely (lower latency scores
    /// higher).
    pub fn verify_node_performance(
        &mut self,
        node_id: &NodeId,
        epoch: u64,
        verified: bool,
        height: Height,
        params: &ProtocolParams,
    ) -> Result<(), RewardError> {
        let current = self.observation_epoch_at(height, params);
        if epoch > current {
            return Err(RewardError::InvalidTimestamp { epoch, current });
        }
        let observation = self
            .observations
            .get_mut(&(node_id.clone(), epoch))
            .ok_or_else(|| RewardError::ObservationNotFound {
                node: node_id.to_string(),
                epoch,
            })?;

        if !verified {
            return Ok(());
        }

        observation.verified = true;
        let uptime = observation.uptime;
        let rt_score = response_time_score(observation.response_time, params);

        let score = self
            .scores
            .entry(node_id.clone())
            .or_insert_with(|| NodeScore::unrated(params));
        score.uptime_score = uptime;
        score.response_time_score = rt_score;
        score.performance_verified = true;
        Ok(())
    }

    /// Admin-set community rating, the second input to the node performance
    /// score.
    pub fn set_community_rating(
        &mut self,
        nodes: &NodeDirectory,
        node_id: &NodeId,
        rating: u64,
        params: &ProtocolParams,
    ) -> Result<(), RewardError> {
        if !nodes.is_registered(node_id) {
            return Err(RewardError::InvalidNode(node_id.to_string()));
        }
        if rating > 100 {
            return Err(RewardError::InvalidAmount {
                field: "community rating",
                value: rating,
            });
        }
        self.scores
            .entry(node_id.clone())
            .or_insert_with(|| NodeScore::unrated(params))
            .community_rating = rating;
        Ok(())
    }

    /// Admin accuracy verdict for a verifier's past observation. Updates the
    /// verifier's correctness counters in the directory.
    pub fn update_verifier_accuracy(
        &mut self,
        verifiers: &mut VerifierDirectory,
        verifier: &Address,
        node_id: &NodeId,
        epoch: u64,
        accurate: bool,
    ) -> Result<(), RewardError> {
        if !verifiers.is_registered(verifier) {
            return Err(RewardError::InvalidVerifier(verifier.to_string()));
        }
        if !self.observations.contains_key(&(node_id.clone(), epoch)) {
            return Err(RewardError::ObservationNotFound {
                node: node_id.to_string(),
                epoch,
            });
        }
        verifiers.record_accuracy(verifier, accurate)?;
        Ok(())
    }

    // ── Pools & claims ──────────────────────────────────────────────────

    /// Fund (or re-fund) the reward pool for an epoch. Re-funding resets the
    /// remaining balances and clears the distributed latch.
    pub fn set_epoch_rewards(&mut self, epoch: u64, node_pool: u128, verifier_pool: u128) {
        self.pools
            .insert(epoch, RewardPool::funded(node_pool, verifier_pool));
    }

    /// Claim the caller's share of an epoch's pool, exactly once.
    ///
    /// The epoch must be strictly below the payable boundary, distribution
    /// must be globally enabled, the pool must be funded and undistributed,
    /// and the participant must not have claimed before. Both pool debits
    /// are checked before anything is written.
    pub fn claim_rewards(
        &mut self,
        nodes: &NodeDirectory,
        verifiers: &VerifierDirectory,
        participant: &Address,
        epoch: u64,
        params: &ProtocolParams,
    ) -> Result<ClaimOutcome, RewardError> {
        let is_operator = nodes.owns_any(participant);
        let is_verifier = verifiers.is_registered(participant);
        if !is_operator && !is_verifier {
            return Err(RewardError::NotAuthorized(participant.to_string()));
        }
        if epoch >= self.payable_epoch {
            return Err(RewardError::InvalidTimestamp {
                epoch,
                current: self.payable_epoch,
            });
        }
        if !self.distribution_enabled {
            return Err(RewardError::DistributionLocked);
        }
        let pool = self
            .pools
            .get(&epoch)
            .ok_or(RewardError::NoRewardsAvailable(epoch))?;
        if pool.distributed {
            return Err(RewardError::DistributionLocked);
        }
        if self.claims.contains_key(&(participant.clone(), epoch)) {
            return Err(RewardError::RewardClaimed(epoch));
        }

        let node_total = self.node_component(nodes, participant, pool.node_pool, params);
        let verifier_total = self.verifier_component(verifiers, participant, pool.verifier_pool, params);
        if node_total == 0 && verifier_total == 0 {
            return Err(RewardError::NoRewardsAvailable(epoch));
        }

        // Stage both debits; commit only if neither underflows.
        let node_remaining = pool
            .node_remaining
            .checked_sub(node_total)
            .ok_or(RewardError::PoolExhausted(epoch))?;
        let verifier_remaining = pool
            .verifier_remaining
            .checked_sub(verifier_total)
            .ok_or(RewardError::PoolExhausted(epoch))?;

        let pool = self.pools.get_mut(&epoch).ok_or(RewardError::NoRewardsAvailable(epoch))?;
        pool.node_remaining = node_remaining;
        pool.verifier_remaining = verifier_remaining;
        self.claims.insert(
            (participant.clone(), epoch),
            ClaimRecord {
                participant: participant.clone(),
                epoch,
                node_reward: node_total,
                verifier_reward: verifier_total,
            },
        );

        Ok(ClaimOutcome {
            node_reward: node_total,
            verifier_reward: verifier_total,
        })
    }

    /// Preview the payout a claim would compute, without mutating anything.
    /// Absent pools, scores, or registrations contribute zero; an already
    /// claimed epoch previews as zero.
    pub fn estimate_rewards(
        &self,
        nodes: &NodeDirectory,
        verifiers: &VerifierDirectory,
        participant: &Address,
        epoch: u64,
        params: &ProtocolParams,
    ) -> RewardEstimate {
        if self.claims.contains_key(&(participant.clone(), epoch)) {
            return RewardEstimate::default();
        }
        let Some(pool) = self.pools.get(&epoch) else {
            return RewardEstimate::default();
        };
        RewardEstimate {
            node_reward: self.node_component(nodes, participant, pool.node_pool, params),
            verifier_reward: self.verifier_component(verifiers, participant, pool.verifier_pool, params),
        }
    }

    fn node_component(
        &self,
        nodes: &NodeDirectory,
        participant: &Address,
        node_pool: u128,
        params: &ProtocolParams,
    ) -> u128 {
        nodes
            .nodes_of(participant)
            .into_iter()
            .filter_map(|id| self.scores.get(id))
            .filter(|score| score.performance_verified)
            .map(|score| {
                let perf = node_performance_score(score.uptime_score, score.community_rating, params);
                node_reward(node_pool, node_share_pct(perf, params))
            })
            .sum()
    }

    fn verifier_component(
        &self,
        verifiers: &VerifierDirectory,
        participant: &Address,
        verifier_pool: u128,
        params: &ProtocolParams,
    ) -> u128 {
        let Some(record) = verifiers.get(participant) else {
            return 0;
        };
        let share = verifier_share_pct(
            accuracy_pct(record.correct_count, record.total_count),
            activity_pct(record.total_count, params),
        );
        verifier_reward(verifier_pool, share)
    }

    // ── Read-only queries ───────────────────────────────────────────────

    pub fn get_observation(&self, node_id: &NodeId, epoch: u64) -> Option<&PerformanceObservation> {
        self.observations.get(&(node_id.clone(), epoch))
    }

    pub fn get_node_score(&self, node_id: &NodeId) -> Option<&NodeScore> {
        self.scores.get(node_id)
    }

    pub fn get_pool(&self, epoch: u64) -> Option<&RewardPool> {
        self.pools.get(&epoch)
    }

    pub fn get_claim(&self, participant: &Address, epoch: u64) -> Option<&ClaimRecord> {
        self.claims.get(&(participant.clone(), epoch))
    }

    pub fn has_claimed(&self, participant: &Address, epoch: u64) -> bool {
        self.claims.contains_key(&(participant.clone(), epoch))
    }
}
