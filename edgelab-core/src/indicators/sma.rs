//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window, derived from a prefix
//! sum so each output is O(1): `ma[i] = (S[i+n] - S[i]) / n`.
//! Offset: period - 1 (first value belongs to bar period-1).

use super::Indicator;
use crate::domain::BarSeries;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        moving_average(&bars.closes(), self.period)
    }
}

/// Prefix sums with a leading zero: `S[0] = 0`, `S[k] = x[0] + ... + x[k-1]`.
pub fn prefix_sums(values: &[f64]) -> Vec<f64> {
    let mut sums = Vec::with_capacity(values.len() + 1);
    sums.push(0.0);
    let mut acc = 0.0;
    for v in values {
        acc += v;
        sums.push(acc);
    }
    sums
}

/// Trailing `period`-bar mean. Length `len - period + 1`; empty if the input
/// is shorter than the window or `period` is 0.
pub fn moving_average(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let sums = prefix_sums(values);
    let n = period as f64;
    (period..=values.len())
        .map(|end| (sums[end] - sums[end - period]) / n)
        .collect()
}
