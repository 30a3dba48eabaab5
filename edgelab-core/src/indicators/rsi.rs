//! Relative Strength Index (RSI) with Wilder smoothing.
//!
//! gains = max(dclose, 0), losses = max(-dclose, 0), each Wilder-smoothed.
//! RSI = 100 - 100 / (1 + avg_gain / max(avg_loss, eps))
//! Offset: 1 (the first bar has no close difference).

use super::{wilder, Indicator};
use crate::domain::{BarSeries, EPSILON};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        1
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        rsi(&bars.closes(), self.period)
    }
}

/// RSI over a close series. Length `len - 1`.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();
    let avg_gain = wilder(&gains, period);
    let avg_loss = wilder(&losses, period);
    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| 100.0 - 100.0 / (1.0 + g / l.max(EPSILON)))
        .collect()
}
