use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("directory error: {0}")]
    Directory(#[from] veris_directory::DirectoryError),

    #[error("verification error: {0}")]
    Verification(#[from] veris_verification::VerificationError),

    #[error("reward error: {0}")]
    Reward(#[from] veris_rewards::RewardError),

    #[error("caller {0} is not the protocol admin")]
    NotAdmin(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot codec error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
