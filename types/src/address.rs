//! Account address type with `vrs_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Veris account address, always prefixed with `vrs_`.
///
/// Node operators, verifiers, and the protocol admin are all identified by
/// addresses. Key derivation and signature checks happen on the hosting
/// substrate; inside the engines an address is an opaque identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all Veris account addresses.
    pub const PREFIX: &'static str = "vrs_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `vrs_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with vrs_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
