use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("node {0} is already registered")]
    AlreadyRegistered(String),

    #[error("node {0} is not registered")]
    UnknownNode(String),

    #[error("caller {caller} does not own node {node}")]
    NotOwner { node: String, caller: String },

    #[error("verifier {0} is not registered")]
    VerifierNotRegistered(String),
}
