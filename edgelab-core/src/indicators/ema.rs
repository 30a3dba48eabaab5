//! Exponential Moving Average (EMA).
//!
//! out[0] = x[0]; out[i] = alpha * x[i] + (1 - alpha) * out[i-1], alpha = 2/(span+1).
//! Seeded at the first value, so no warm-up is dropped.
//! Offset: 0.

use super::Indicator;
use crate::domain::BarSeries;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        0
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        ema(&bars.closes(), self.span)
    }
}

/// First-order recursive smoother seeded at `values[0]`.
///
/// Shared by the EMA (`alpha = 2/(span+1)`) and Wilder (`alpha = 1/n`) variants.
pub fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return out;
    };
    let mut state = first;
    out.push(state);
    for &x in iter {
        state = alpha * x + (1.0 - alpha) * state;
        out.push(state);
    }
    out
}

/// EMA of an arbitrary series.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    smooth(values, 2.0 / (span as f64 + 1.0))
}
