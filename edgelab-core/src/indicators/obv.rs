//! On-Balance Volume (OBV).
//!
//! OBV[i] = sum over j <= i of sign(close[j] - prev_close[j]) * volume[j],
//! with the close before bar 0 taken as 0 (the same boundary as ATR), so bar 0
//! contributes +volume[0] for any positive price.
//! Offset: 0.

use super::Indicator;
use crate::domain::series::{diff_from_zero, sign};
use crate::domain::BarSeries;

#[derive(Debug, Clone)]
pub struct Obv {
    name: String,
}

impl Obv {
    pub fn new() -> Self {
        Self {
            name: "obv".to_string(),
        }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        0
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        obv(&bars.closes(), &bars.volumes())
    }
}

pub fn obv(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    diff_from_zero(closes)
        .iter()
        .zip(volumes)
        .scan(0.0, |acc, (d, v)| {
            *acc += sign(*d) * v;
            Some(*acc)
        })
        .collect()
}
