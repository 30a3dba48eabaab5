//! Wilder smoothing: the EMA recurrence with alpha = 1/n, seeded at x[0].

use super::ema::smooth;

pub fn wilder(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "Wilder period must be >= 1");
    smooth(values, 1.0 / period as f64)
}
