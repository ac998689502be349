//! Epoch-based reward apportionment.
//!
//! Verifiers record per-epoch performance observations about nodes; the
//! admin confirms observations, which freezes the node's scores. Per-epoch
//! pools are pre-funded and split between nodes (by weighted performance
//! score) and verifiers (by accuracy x activity), with integer-exact,
//! floor-division arithmetic. Claims are write-once per `(participant,
//! epoch)` and debit a running pool balance that can never go negative.
//!
//! Two epoch notions coexist deliberately: the *observation epoch* is
//! derived from the substrate height, while the *payable epoch* is an
//! admin-advanced counter. An epoch can be current for submissions while
//! not yet payable.

pub mod claim;
pub mod engine;
pub mod error;
pub mod performance;
pub mod pool;

pub use claim::ClaimRecord;
pub use engine::{ClaimOutcome, RewardEngine, RewardEstimate};
pub use error::RewardError;
pub use performance::{NodeScore, PerformanceObservation};
pub use pool::RewardPool;
