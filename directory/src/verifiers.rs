//! Verifier directory — registration, status, and the two reputation notions.
//!
//! A verifier carries a *bounded* reputation in `[0, 100]` (penalized on
//! anomalous attestations, rewarded on agreement) and an *unbounded*
//! `accuracy_points` counter incremented on confirmed-accurate performance
//! observations. The two are deliberately separate: the bounded score feeds
//! anomaly economics, the counters feed the reward formula.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use veris_types::{Address, Height, ProtocolParams};

use crate::error::DirectoryError;

/// The highest reachable bounded reputation.
pub const MAX_REPUTATION: u8 = 100;

/// A registered verifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifierRecord {
    pub identity: Address,
    /// Bounded reputation in `[0, 100]`. Saturates at both ends.
    pub reputation: u8,
    pub active: bool,
    pub registered_at: Height,
    /// Performance observations confirmed accurate by the admin.
    pub correct_count: u64,
    /// Performance observations submitted in total.
    pub total_count: u64,
    /// Unbounded accuracy tally; grows with every confirmed-accurate
    /// observation and never shrinks.
    pub accuracy_points: u64,
}

/// Keyed directory of registered verifiers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VerifierDirectory {
    verifiers: HashMap<Address, VerifierRecord>,
}

impl VerifierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a verifier. Idempotent: a second registration for the same
    /// identity is a no-op success. Returns whether the record was created.
    pub fn register(&mut self, identity: Address, height: Height, params: &ProtocolParams) -> bool {
        if self.verifiers.contains_key(&identity) {
            return false;
        }
        self.verifiers.insert(
            identity.clone(),
            VerifierRecord {
                identity,
                reputation: params.initial_reputation,
                active: true,
                registered_at: height,
                correct_count: 0,
                total_count: 0,
                accuracy_points: 0,
            },
        );
        true
    }

    /// Change a verifier's active flag. Authorization is the caller's
    /// responsibility (admin capability in the node facade).
    pub fn set_active(&mut self, identity: &Address, active: bool) -> Result<(), DirectoryError> {
        let record = self.get_mut(identity)?;
        record.active = active;
        Ok(())
    }

    /// Apply a bounded reputation adjustment.
    ///
    /// Anomalous: `reputation = max(0, reputation - penalty)`.
    /// Agreement: `reputation = min(100, reputation + reward)`.
    /// Returns the new reputation.
    pub fn adjust_reputation(
        &mut self,
        identity: &Address,
        is_anomalous: bool,
        params: &ProtocolParams,
    ) -> Result<u8, DirectoryError> {
        let record = self.get_mut(identity)?;
        record.reputation = if is_anomalous {
            record.reputation.saturating_sub(params.reputation_penalty)
        } else {
            record
                .reputation
                .saturating_add(params.reputation_reward)
                .min(MAX_REPUTATION)
        };
        Ok(record.reputation)
    }

    /// Count one submitted performance observation.
    pub fn record_submission(&mut self, identity: &Address) -> Result<(), DirectoryError> {
        let record = self.get_mut(identity)?;
        record.total_count = record.total_count.saturating_add(1);
        Ok(())
    }

    /// Record an admin accuracy verdict for a past observation.
    pub fn record_accuracy(
        &mut self,
        identity: &Address,
        accurate: bool,
    ) -> Result<(), DirectoryError> {
        let record = self.get_mut(identity)?;
        if accurate {
            record.correct_count = record.correct_count.saturating_add(1);
            record.accuracy_points = record.accuracy_points.saturating_add(1);
        }
        Ok(())
    }

    pub fn get(&self, identity: &Address) -> Option<&VerifierRecord> {
        self.verifiers.get(identity)
    }

    pub fn is_registered(&self, identity: &Address) -> bool {
        self.verifiers.contains_key(identity)
    }

    pub fn is_active(&self, identity: &Address) -> bool {
        self.verifiers.get(identity).is_some_and(|v| v.active)
    }

    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }

    fn get_mut(&mut self, identity: &Address) -> Result<&mut VerifierRecord, DirectoryError> {
        self.verifiers
            .get_mut(identity)
            .ok_or_else(|| DirectoryError::VerifierNotRegistered(identity.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(format!("vrs_{s}"))
    }

    fn params() -> ProtocolParams {
        ProtocolParams::defaults()
    }

    #[test]
    fn registration_starts_neutral() {
        let mut dir = VerifierDirectory::new();
        assert!(dir.register(addr("v1"), Height::new(5), &params()));

        let v = dir.get(&addr("v1")).unwrap();
        assert_eq!(v.reputation, 50);
        assert!(v.active);
        assert_eq!(v.registered_at, Height::new(5));
        assert_eq!(v.correct_count, 0);
        assert_eq!(v.total_count, 0);
        assert_eq!(v.accuracy_points, 0);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut dir = VerifierDirectory::new();
        assert!(dir.register(addr("v1"), Height::new(0), &params()));
        dir.adjust_reputation(&addr("v1"), false, &params()).unwrap();

        // Second call is a no-op success, not a reset.
        assert!(!dir.register(addr("v1"), Height::new(99), &params()));
        let v = dir.get(&addr("v1")).unwrap();
        assert_eq!(v.reputation, 52);
        assert_eq!(v.registered_at, Height::new(0));
    }

    #[test]
    fn agreement_rewards_two_points() {
        let mut dir = VerifierDirectory::new();
        dir.register(addr("v1"), Height::new(0), &params());
        let rep = dir.adjust_reputation(&addr("v1"), false, &params()).unwrap();
        assert_eq!(rep, 52);
    }

    #[test]
    fn anomaly_penalizes_five_points() {
        let mut dir = VerifierDirectory::new();
        dir.register(addr("v1"), Height::new(0), &params());
        let rep = dir.adjust_reputation(&addr("v1"), true, &params()).unwrap();
        assert_eq!(rep, 45);
    }

    #[test]
    fn reputation_floors_at_zero() {
        let mut dir = VerifierDirectory::new();
        dir.register(addr("v1"), Height::new(0), &params());
        for _ in 0..30 {
            dir.adjust_reputation(&addr("v1"), true, &params()).unwrap();
        }
        assert_eq!(dir.get(&addr("v1")).unwrap().reputation, 0);
    }

    #[test]
    fn reputation_caps_at_hundred() {
        let mut dir = VerifierDirectory::new();
        dir.register(addr("v1"), Height::new(0), &params());
        for _ in 0..60 {
            dir.adjust_reputation(&addr("v1"), false, &params()).unwrap();
        }
        assert_eq!(dir.get(&addr("v1")).unwrap().reputation, 100);
    }

    #[test]
    fn unknown_verifier_errors() {
        let mut dir = VerifierDirectory::new();
        let err = dir.adjust_reputation(&addr("ghost"), true, &params()).unwrap_err();
        assert_eq!(err, DirectoryError::VerifierNotRegistered("vrs_ghost".into()));
        assert!(dir.record_submission(&addr("ghost")).is_err());
        assert!(dir.record_accuracy(&addr("ghost"), true).is_err());
        assert!(dir.set_active(&addr("ghost"), false).is_err());
    }

    #[test]
    fn accuracy_counters_track_separately_from_reputation() {
        let mut dir = VerifierDirectory::new();
        dir.register(addr("v1"), Height::new(0), &params());

        dir.record_submission(&addr("v1")).unwrap();
        dir.record_submission(&addr("v1")).unwrap();
        dir.record_accuracy(&addr("v1"), true).unwrap();
        dir.record_accuracy(&addr("v1"), false).unwrap();

        let v = dir.get(&addr("v1")).unwrap();
        assert_eq!(v.total_count, 2);
        assert_eq!(v.correct_count, 1);
        assert_eq!(v.accuracy_points, 1);
        // Bounded reputation untouched by accuracy bookkeeping.
        assert_eq!(v.reputation, 50);
    }

    #[test]
    fn deactivated_verifier_stays_registered() {
        let mut dir = VerifierDirectory::new();
        dir.register(addr("v1"), Height::new(0), &params());
        dir.set_active(&addr("v1"), false).unwrap();

        assert!(dir.is_registered(&addr("v1")));
        assert!(!dir.is_active(&addr("v1")));
    }
}
