//! Per-epoch reward pools with running remaining balances.

use serde::{Deserialize, Serialize};

/// A pre-funded reward pool for one epoch.
///
/// `node_remaining` and `verifier_remaining` start at the funded amounts and
/// are debited by every successful claim; a claim that would drive either
/// negative fails instead. `distributed` is a one-way latch checked by the
/// claim path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPool {
    pub node_pool: u128,
    pub verifier_pool: u128,
    pub node_remaining: u128,
    pub verifier_remaining: u128,
    pub distributed: bool,
}

impl RewardPool {
    /// A freshly funded pool.
    pub fn funded(node_pool: u128, verifier_pool: u128) -> Self {
        Self {
            node_pool,
            verifier_pool,
            node_remaining: node_pool,
            verifier_remaining: verifier_pool,
            distributed: false,
        }
    }

    /// Total already paid out of the node side.
    pub fn node_paid(&self) -> u128 {
        self.node_pool - self.node_remaining
    }

    /// Total already paid out of the verifier side.
    pub fn verifier_paid(&self) -> u128 {
        self.verifier_pool - self.verifier_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funded_pool_starts_whole() {
        let p = RewardPool::funded(1000, 500);
        assert_eq!(p.node_remaining, 1000);
        assert_eq!(p.verifier_remaining, 500);
        assert_eq!(p.node_paid(), 0);
        assert_eq!(p.verifier_paid(), 0);
        assert!(!p.distributed);
    }
}
