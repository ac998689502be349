//! Identity stores for the Veris protocol.
//!
//! Two keyed directories back every other engine:
//! - [`NodeDirectory`] — registered infrastructure nodes and their owners.
//! - [`VerifierDirectory`] — registered verifiers with their bounded
//!   reputation and accuracy counters.
//!
//! Both are soft-flag stores: records are deactivated, never hard-deleted.

pub mod error;
pub mod nodes;
pub mod verifiers;

pub use error::DirectoryError;
pub use nodes::{NodeDirectory, NodeRecord};
pub use verifiers::{VerifierDirectory, VerifierRecord};
