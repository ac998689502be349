//! The Veris node — one call surface over the directories and engines.
//!
//! The hosting substrate totally orders calls and supplies the block
//! height; the node mirrors that height and hands it to the engines. All
//! privileged operations check the caller against the configured admin
//! identity before touching anything.

use serde::{Deserialize, Serialize};

use veris_directory::{NodeDirectory, NodeRecord, VerifierDirectory, VerifierRecord};
use veris_rewards::{
    ClaimOutcome, ClaimRecord, PerformanceObservation, RewardEngine, RewardEstimate, RewardPool,
};
use veris_types::{Address, Height, MetricId, NodeId, ProtocolParams, Timestamp};
use veris_verification::{
    Attestation, AttestationAccepted, Metric, SnapshotLog, VerificationEngine,
};

use crate::config::NodeConfig;
use crate::error::NodeError;

/// The protocol state machine behind the public operation surface.
pub struct VerisNode {
    admin: Address,
    params: ProtocolParams,
    nodes: NodeDirectory,
    verifiers: VerifierDirectory,
    verification: VerificationEngine,
    rewards: RewardEngine,
    /// Mirror of the substrate's block height, advanced by the host.
    height: Height,
}

impl VerisNode {
    /// Build a fresh node from a validated config.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let admin = config.admin_address()?;
        let mut rewards = RewardEngine::new();
        rewards.set_distribution_enabled(config.distribution_enabled);

        tracing::info!(admin = %admin, "veris node initialized");
        Ok(Self {
            admin,
            params: config.params,
            nodes: NodeDirectory::new(),
            verifiers: VerifierDirectory::new(),
            verification: VerificationEngine::new(),
            rewards,
            height: Height::GENESIS,
        })
    }

    // ── Substrate clock ─────────────────────────────────────────────────

    pub fn height(&self) -> Height {
        self.height
    }

    /// Advance the mirrored block height (host-driven).
    pub fn advance_height(&mut self, blocks: u64) -> Height {
        self.height = self.height.advanced(blocks);
        self.height
    }

    pub fn set_height(&mut self, height: Height) {
        self.height = height;
    }

    // ── Capability checks ───────────────────────────────────────────────

    pub fn is_admin(&self, caller: &Address) -> bool {
        caller == &self.admin
    }

    fn require_admin(&self, caller: &Address) -> Result<(), NodeError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(NodeError::NotAdmin(caller.to_string()))
        }
    }

    // ── Node registry operations ────────────────────────────────────────

    pub fn register_node(&mut self, caller: &Address, node_id: NodeId) -> Result<(), NodeError> {
        self.nodes
            .register(node_id.clone(), caller.clone(), self.height)?;
        tracing::info!(node = %node_id, owner = %caller, height = self.height.as_u64(), "node registered");
        Ok(())
    }

    pub fn deactivate_node(&mut self, caller: &Address, node_id: &NodeId) -> Result<(), NodeError> {
        self.nodes.set_active(node_id, caller, false)?;
        tracing::info!(node = %node_id, "node deactivated by owner");
        Ok(())
    }

    pub fn reactivate_node(&mut self, caller: &Address, node_id: &NodeId) -> Result<(), NodeError> {
        self.nodes.set_active(node_id, caller, true)?;
        tracing::info!(node = %node_id, "node reactivated by owner");
        Ok(())
    }

    /// Admin-forced deactivation, bypassing the ownership check.
    pub fn admin_deactivate_node(
        &mut self,
        caller: &Address,
        node_id: &NodeId,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.nodes.set_active_admin(node_id, false)?;
        tracing::warn!(node = %node_id, "node deactivated by admin");
        Ok(())
    }

    // ── Verifier registry operations ────────────────────────────────────

    /// Register the caller as a verifier. Idempotent: returns whether a new
    /// record was created.
    pub fn register_verifier(&mut self, caller: &Address) -> bool {
        let created = self
            .verifiers
            .register(caller.clone(), self.height, &self.params);
        if created {
            tracing::info!(verifier = %caller, reputation = self.params.initial_reputation, "verifier registered");
        }
        created
    }

    pub fn update_verifier_status(
        &mut self,
        caller: &Address,
        verifier: &Address,
        active: bool,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.verifiers.set_active(verifier, active)?;
        tracing::info!(verifier = %verifier, active, "verifier status updated");
        Ok(())
    }

    /// Admin update of the quorum threshold.
    pub fn update_verification_threshold(
        &mut self,
        caller: &Address,
        threshold: u32,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        let previous = self.params.quorum_threshold;
        self.params.quorum_threshold = threshold;
        tracing::info!(previous, threshold, "verification threshold updated");
        Ok(())
    }

    // ── Metric verification operations ──────────────────────────────────

    pub fn submit_metric(
        &mut self,
        caller: &Address,
        node_id: NodeId,
        metric_id: MetricId,
        value: u128,
        now: Timestamp,
    ) -> Result<(), NodeError> {
        self.verification.submit_metric(
            &self.nodes,
            node_id.clone(),
            metric_id.clone(),
            caller,
            value,
            now,
            self.height,
        )?;
        tracing::debug!(node = %node_id, metric = %metric_id, value, height = self.height.as_u64(), "metric submitted");
        Ok(())
    }

    pub fn verify_metric(
        &mut self,
        caller: &Address,
        node_id: &NodeId,
        metric_id: &MetricId,
        observed_value: u128,
        now: Timestamp,
    ) -> Result<AttestationAccepted, NodeError> {
        let accepted = self.verification.verify_metric(
            &mut self.verifiers,
            node_id,
            metric_id,
            caller,
            observed_value,
            now,
            self.height,
            &self.params,
        )?;
        if accepted.sealed {
            tracing::info!(node = %node_id, metric = %metric_id, count = accepted.verification_count, "metric sealed at quorum");
        } else {
            tracing::debug!(node = %node_id, metric = %metric_id, count = accepted.verification_count, "attestation accepted");
        }
        Ok(accepted)
    }

    // ── Reward operations ───────────────────────────────────────────────

    pub fn submit_node_performance(
        &mut self,
        caller: &Address,
        node_id: &NodeId,
        uptime: u64,
        response_time: u64,
    ) -> Result<u64, NodeError> {
        let epoch = self.rewards.submit_node_performance(
            &self.nodes,
            &mut self.verifiers,
            caller,
            node_id,
            uptime,
            response_time,
            self.height,
            &self.params,
        )?;
        tracing::debug!(node = %node_id, epoch, uptime, response_time, "performance observation recorded");
        Ok(epoch)
    }

    pub fn verify_node_performance(
        &mut self,
        caller: &Address,
        node_id: &NodeId,
        epoch: u64,
        verified: bool,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.rewards
            .verify_node_performance(node_id, epoch, verified, self.height, &self.params)?;
        tracing::info!(node = %node_id, epoch, verified, "performance observation confirmed");
        Ok(())
    }

    pub fn set_community_rating(
        &mut self,
        caller: &Address,
        node_id: &NodeId,
        rating: u64,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.rewards
            .set_community_rating(&self.nodes, node_id, rating, &self.params)?;
        tracing::info!(node = %node_id, rating, "community rating set");
        Ok(())
    }

    pub fn update_verifier_accuracy(
        &mut self,
        caller: &Address,
        verifier: &Address,
        node_id: &NodeId,
        epoch: u64,
        accurate: bool,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.rewards
            .update_verifier_accuracy(&mut self.verifiers, verifier, node_id, epoch, accurate)?;
        tracing::debug!(verifier = %verifier, node = %node_id, epoch, accurate, "verifier accuracy updated");
        Ok(())
    }

    pub fn set_epoch_rewards(
        &mut self,
        caller: &Address,
        epoch: u64,
        node_pool: u128,
        verifier_pool: u128,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.rewards.set_epoch_rewards(epoch, node_pool, verifier_pool);
        tracing::info!(epoch, node_pool, verifier_pool, "epoch reward pool funded");
        Ok(())
    }

    pub fn advance_epoch(&mut self, caller: &Address) -> Result<u64, NodeError> {
        self.require_admin(caller)?;
        let epoch = self.rewards.advance_epoch();
        tracing::info!(payable_epoch = epoch, "payable epoch advanced");
        Ok(epoch)
    }

    pub fn set_distribution_enabled(
        &mut self,
        caller: &Address,
        enabled: bool,
    ) -> Result<(), NodeError> {
        self.require_admin(caller)?;
        self.rewards.set_distribution_enabled(enabled);
        tracing::info!(enabled, "reward distribution switch set");
        Ok(())
    }

    pub fn claim_rewards(&mut self, caller: &Address, epoch: u64) -> Result<ClaimOutcome, NodeError> {
        let outcome =
            self.rewards
                .claim_rewards(&self.nodes, &self.verifiers, caller, epoch, &self.params)?;
        tracing::info!(
            participant = %caller,
            epoch,
            node_reward = outcome.node_reward,
            verifier_reward = outcome.verifier_reward,
            "rewards claimed"
        );
        Ok(outcome)
    }

    // ── Read-only queries ───────────────────────────────────────────────

    pub fn get_node(&self, node_id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.get(node_id)
    }

    pub fn get_verifier(&self, identity: &Address) -> Option<&VerifierRecord> {
        self.verifiers.get(identity)
    }

    pub fn get_metric(&self, node_id: &NodeId, metric_id: &MetricId) -> Option<&Metric> {
        self.verification.get_metric(node_id, metric_id)
    }

    pub fn get_attestation(
        &self,
        node_id: &NodeId,
        metric_id: &MetricId,
        verifier: &Address,
    ) -> Option<&Attestation> {
        self.verification.get_attestation(node_id, metric_id, verifier)
    }

    pub fn verified_snapshots(&self) -> &SnapshotLog {
        self.verification.snapshots()
    }

    pub fn get_observation(&self, node_id: &NodeId, epoch: u64) -> Option<&PerformanceObservation> {
        self.rewards.get_observation(node_id, epoch)
    }

    pub fn get_pool(&self, epoch: u64) -> Option<&RewardPool> {
        self.rewards.get_pool(epoch)
    }

    pub fn get_claim(&self, participant: &Address, epoch: u64) -> Option<&ClaimRecord> {
        self.rewards.get_claim(participant, epoch)
    }

    pub fn estimate_rewards(&self, participant: &Address, epoch: u64) -> RewardEstimate {
        self.rewards
            .estimate_rewards(&self.nodes, &self.verifiers, participant, epoch, &self.params)
    }

    pub fn payable_epoch(&self) -> u64 {
        self.rewards.payable_epoch()
    }

    /// The height-derived epoch the next observation would land in.
    pub fn observation_epoch(&self) -> u64 {
        self.rewards.observation_epoch_at(self.height, &self.params)
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Diagnostic summary for operators and log pipelines.
    pub fn status_json(&self) -> serde_json::Value {
        serde_json::json!({
            "height": self.height.as_u64(),
            "observation_epoch": self.observation_epoch(),
            "payable_epoch": self.payable_epoch(),
            "registered_nodes": self.nodes.len(),
            "registered_verifiers": self.verifiers.len(),
            "sealed_metrics": self.verification.snapshots().len(),
            "distribution_enabled": self.rewards.distribution_enabled(),
        })
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Capture the full protocol state for host persistence.
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            params: self.params.clone(),
            height: self.height,
            nodes: self.nodes.clone(),
            verifiers: self.verifiers.clone(),
            verification: self.verification.clone(),
            rewards: self.rewards.clone(),
        }
    }

    /// Rebuild a node from a persisted snapshot. The admin identity comes
    /// from the config, not the snapshot.
    pub fn restore(config: NodeConfig, snapshot: NodeSnapshot) -> Result<Self, NodeError> {
        let admin = config.admin_address()?;
        tracing::info!(
            admin = %admin,
            height = snapshot.height.as_u64(),
            nodes = snapshot.nodes.len(),
            verifiers = snapshot.verifiers.len(),
            "veris node restored from snapshot"
        );
        Ok(Self {
            admin,
            params: snapshot.params,
            nodes: snapshot.nodes,
            verifiers: snapshot.verifiers,
            verification: snapshot.verification,
            rewards: snapshot.rewards,
            height: snapshot.height,
        })
    }

    /// Serialize the state snapshot to bytes.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, NodeError> {
        bincode::serialize(&self.snapshot()).map_err(|e| NodeError::Snapshot(e.to_string()))
    }

    /// Rebuild a node from snapshot bytes.
    pub fn from_snapshot_bytes(config: NodeConfig, bytes: &[u8]) -> Result<Self, NodeError> {
        let snapshot: NodeSnapshot =
            bincode::deserialize(bytes).map_err(|e| NodeError::Snapshot(e.to_string()))?;
        Self::restore(config, snapshot)
    }
}

/// Serializable snapshot of the whole protocol state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub params: ProtocolParams,
    pub height: Height,
    pub nodes: NodeDirectory,
    pub verifiers: VerifierDirectory,
    pub verification: VerificationEngine,
    pub rewards: RewardEngine,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(format!("vrs_{s}"))
    }

    fn test_node() -> VerisNode {
        VerisNode::new(NodeConfig::with_admin("vrs_admin")).unwrap()
    }

    #[test]
    fn admin_capability_is_checked() {
        let mut node = test_node();
        let outsider = addr("outsider");

        assert!(matches!(
            node.update_verification_threshold(&outsider, 5).unwrap_err(),
            NodeError::NotAdmin(_)
        ));
        assert!(matches!(
            node.advance_epoch(&outsider).unwrap_err(),
            NodeError::NotAdmin(_)
        ));
        assert!(matches!(
            node.set_epoch_rewards(&outsider, 0, 1, 1).unwrap_err(),
            NodeError::NotAdmin(_)
        ));
        assert!(matches!(
            node.set_distribution_enabled(&outsider, false).unwrap_err(),
            NodeError::NotAdmin(_)
        ));

        let admin = addr("admin");
        assert!(node.update_verification_threshold(&admin, 5).is_ok());
        assert_eq!(node.params().quorum_threshold, 5);
    }

    #[test]
    fn height_mirror_drives_epochs() {
        let mut node = test_node();
        assert_eq!(node.observation_epoch(), 0);
        node.advance_height(300);
        assert_eq!(node.height(), Height::new(300));
        assert_eq!(node.observation_epoch(), 2);
        // Payable epoch is independent.
        assert_eq!(node.payable_epoch(), 0);
    }

    #[test]
    fn register_node_uses_current_height() {
        let mut node = test_node();
        node.advance_height(42);
        node.register_node(&addr("alice"), NodeId::new("n1")).unwrap();
        assert_eq!(
            node.get_node(&NodeId::new("n1")).unwrap().registered_at,
            Height::new(42)
        );
    }

    #[test]
    fn status_json_reports_counts() {
        let mut node = test_node();
        node.register_node(&addr("alice"), NodeId::new("n1")).unwrap();
        node.register_verifier(&addr("v1"));

        let status = node.status_json();
        assert_eq!(status["registered_nodes"], 1);
        assert_eq!(status["registered_verifiers"], 1);
        assert_eq!(status["sealed_metrics"], 0);
        assert_eq!(status["distribution_enabled"], true);
    }

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let mut node = test_node();
        node.advance_height(10);
        node.register_node(&addr("alice"), NodeId::new("n1")).unwrap();
        node.register_verifier(&addr("v1"));
        node.submit_metric(
            &addr("alice"),
            NodeId::new("n1"),
            MetricId::new("uptime"),
            100,
            Timestamp::new(1),
        )
        .unwrap();

        let bytes = node.snapshot_bytes().unwrap();
        let restored =
            VerisNode::from_snapshot_bytes(NodeConfig::with_admin("vrs_admin"), &bytes).unwrap();

        assert_eq!(restored.height(), Height::new(10));
        assert!(restored.get_node(&NodeId::new("n1")).is_some());
        assert!(restored.get_verifier(&addr("v1")).is_some());
        let metric = restored
            .get_metric(&NodeId::new("n1"), &MetricId::new("uptime"))
            .unwrap();
        assert_eq!(metric.value, 100);
    }

    #[test]
    fn distribution_switch_comes_from_config() {
        let mut config = NodeConfig::with_admin("vrs_admin");
        config.distribution_enabled = false;
        let node = VerisNode::new(config).unwrap();
        assert_eq!(node.status_json()["distribution_enabled"], false);
    }
}
