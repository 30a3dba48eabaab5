//! Stochastic oscillator %K.
//!
//! %K = 100 * (close - min(low, n)) / max(max(high, n) - min(low, n), eps)
//! Offset: period - 1.

use super::Indicator;
use crate::domain::{BarSeries, EPSILON};

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    name: String,
}

impl Stochastic {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Stochastic period must be >= 1");
        Self {
            period,
            name: format!("stoch_k_{period}"),
        }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        stochastic_k(&bars.highs(), &bars.lows(), &bars.closes(), self.period)
    }
}

/// %K per trailing window. Length `len - period + 1`.
pub fn stochastic_k(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }
    (period - 1..closes.len())
        .map(|i| {
            let start = i + 1 - period;
            let lowest = lows[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
            let highest = highs[start..=i]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            100.0 * (closes[i] - lowest) / (highest - lowest).max(EPSILON)
        })
        .collect()
}
