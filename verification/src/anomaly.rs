//! Deviation scoring for attestations.

/// The outcome of comparing a verifier's observation against the reported
/// value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnomalyVerdict {
    /// Absolute difference between reported and observed value.
    pub deviation: u128,
    /// Maximum tolerated deviation: `reported * deviation_pct / 100`.
    pub threshold: u128,
    pub is_anomalous: bool,
}

/// Score an observation against the reported value.
///
/// A deviation strictly above the threshold is anomalous; the threshold
/// itself is tolerated.
pub fn assess(reported: u128, observed: u128, deviation_pct: u128) -> AnomalyVerdict {
    let deviation = reported.abs_diff(observed);
    let threshold = reported.saturating_mul(deviation_pct) / 100;
    AnomalyVerdict {
        deviation,
        threshold,
        is_anomalous: deviation > threshold,
    }
}
