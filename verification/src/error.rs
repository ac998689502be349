use thiserror::Error;

use veris_directory::DirectoryError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("node {0} is not registered")]
    UnknownNode(String),

    #[error("node {0} is not active")]
    NodeInactive(String),

    #[error("caller {caller} does not own node {node}")]
    NotOwner { node: String, caller: String },

    #[error("verifier {0} is not registered")]
    VerifierNotRegistered(String),

    #[error("verifier {0} is not active")]
    VerifierInactive(String),

    #[error("no pending metric {metric} for node {node}")]
    MetricNotFound { node: String, metric: String },

    #[error("metric {metric} for node {node} is already verified")]
    AlreadyVerified { node: String, metric: String },

    #[error("metric expired: submitted at height {submitted}, attested at {current}")]
    MetricExpired { submitted: u64, current: u64 },

    #[error("verifier {0} has already attested this metric")]
    DuplicateAttestation(String),

    #[error("anomalous attestation: deviation {deviation} exceeds threshold {threshold}")]
    AnomalyDetected { deviation: u128, threshold: u128 },

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}
