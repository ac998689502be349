//! Block height type — the substrate's monotonically increasing counter.
//!
//! Heights drive metric expiry and the derived observation-epoch index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height on the hosting substrate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height(u64);

impl Height {
    /// Height zero (genesis).
    pub const GENESIS: Self = Self(0);

    pub fn new(h: u64) -> Self {
        Self(h)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Blocks elapsed since `earlier` (saturating at 0 for out-of-order input).
    pub fn blocks_since(&self, earlier: Height) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// The observation epoch this height falls in, for a given epoch length.
    /// Floor division; epoch 0 covers heights `0..epoch_length`.
    pub fn epoch_at(&self, epoch_length: u64) -> u64 {
        debug_assert!(epoch_length > 0, "epoch length must be non-zero");
        self.0 / epoch_length.max(1)
    }

    /// This height advanced by `blocks`.
    pub fn advanced(&self, blocks: u64) -> Height {
        Self(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_boundaries() {
        assert_eq!(Height::new(0).epoch_at(144), 0);
        assert_eq!(Height::new(143).epoch_at(144), 0);
        assert_eq!(Height::new(144).epoch_at(144), 1);
        assert_eq!(Height::new(287).epoch_at(144), 1);
        assert_eq!(Height::new(288).epoch_at(144), 2);
    }

    #[test]
    fn blocks_since_saturates() {
        assert_eq!(Height::new(10).blocks_since(Height::new(4)), 6);
        assert_eq!(Height::new(4).blocks_since(Height::new(10)), 0);
    }

    #[test]
    fn advanced_moves_forward() {
        assert_eq!(Height::new(5).advanced(3), Height::new(8));
    }
}
