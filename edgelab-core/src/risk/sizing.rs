//! Position sizing: fractional Kelly and hard caps.

use crate::domain::series::{mean, sample_variance};
use crate::domain::EPSILON;

/// `clip(f * mean / max(var(ddof=1), eps), -1, 1)` over an estimation sample.
pub fn kelly_fraction(fraction: f64, returns: &[f64]) -> f64 {
    let variance = sample_variance(returns).max(EPSILON);
    (fraction * mean(returns) / variance).clamp(-1.0, 1.0)
}

/// Clamp each position to `[-cap, cap]`.
pub fn max_position(cap: f64, positions: &[f64]) -> Vec<f64> {
    positions.iter().map(|p| p.clamp(-cap, cap)).collect()
}
