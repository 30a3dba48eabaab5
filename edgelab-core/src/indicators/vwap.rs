//! Cumulative volume-weighted average price.
//!
//! VWAP[i] = sum(typical * volume)[0..=i] / max(sum(volume)[0..=i], eps),
//! typical = (high + low + close) / 3.
//! Offset: 0.

use super::Indicator;
use crate::domain::{BarSeries, EPSILON};

#[derive(Debug, Clone)]
pub struct Vwap {
    name: String,
}

impl Vwap {
    pub fn new() -> Self {
        Self {
            name: "vwap".to_string(),
        }
    }
}

impl Default for Vwap {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> usize {
        0
    }

    fn compute(&self, bars: &BarSeries) -> Vec<f64> {
        let typical: Vec<f64> = bars.bars().iter().map(|b| b.typical_price()).collect();
        vwap(&typical, &bars.volumes())
    }
}

pub fn vwap(typical: &[f64], volumes: &[f64]) -> Vec<f64> {
    let mut pv = 0.0;
    let mut vol = 0.0;
    typical
        .iter()
        .zip(volumes)
        .map(|(p, v)| {
            pv += p * v;
            vol += v;
            pv / vol.max(EPSILON)
        })
        .collect()
}
