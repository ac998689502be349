//! Write-once claim records.

use serde::{Deserialize, Serialize};
use veris_types::Address;

/// Proof that a participant claimed their share of an epoch's pool.
///
/// At most one record exists per `(participant, epoch)`; its presence is
/// what makes a second claim fail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub participant: Address,
    pub epoch: u64,
    /// Node-pool component of the payout.
    pub node_reward: u128,
    /// Verifier-pool component of the payout.
    pub verifier_reward: u128,
}

impl ClaimRecord {
    pub fn amount(&self) -> u128 {
        self.node_reward + self.verifier_reward
    }
}
