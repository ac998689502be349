use thiserror::Error;

use veris_directory::DirectoryError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewardError {
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("node {0} is not registered")]
    InvalidNode(String),

    #[error("invalid {field}: {value}")]
    InvalidAmount { field: &'static str, value: u64 },

    #[error("epoch {epoch} is out of range (current {current})")]
    InvalidTimestamp { epoch: u64, current: u64 },

    #[error("verifier {0} is not registered")]
    InvalidVerifier(String),

    #[error("rewards for epoch {0} already claimed")]
    RewardClaimed(u64),

    #[error("reward distribution is locked")]
    DistributionLocked,

    #[error("no rewards available for epoch {0}")]
    NoRewardsAvailable(u64),

    #[error("reward pool for epoch {0} is exhausted")]
    PoolExhausted(u64),

    #[error("no performance observation for node {node} in epoch {epoch}")]
    ObservationNotFound { node: String, epoch: u64 },

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}
