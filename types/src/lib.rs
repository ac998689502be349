//! Fundamental types for the Veris protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, node and metric identifiers, block heights,
//! timestamps, and protocol parameters.

pub mod address;
pub mod height;
pub mod id;
pub mod params;
pub mod time;

pub use address::Address;
pub use height::Height;
pub use id::{MetricId, NodeId};
pub use params::ProtocolParams;
pub use time::Timestamp;
