//! Transaction cost models: per-bar cost of changing the position.
//!
//! Position changes use the zero-sentinel convention, so entering from the
//! implicit flat state before bar 0 is charged on bar 0.

use crate::domain::series::{diff_from_zero, ensure_same_len};
use crate::domain::{SeriesError, EPSILON};

/// Cost of a position change, in return units (positive = cost).
pub trait CostModel: Send + Sync {
    /// Cost of moving the position by `delta` on a bar that traded `volume`.
    fn cost(&self, delta: f64, volume: f64) -> f64;

    /// Name of this model
    fn name(&self) -> &str;
}

/// Square-root market impact: `adv_frac * sqrt(|delta| / (adv_frac * volume + eps))`.
/// `adv_frac = 0` charges nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareRootImpact {
    pub adv_frac: f64,
}

impl SquareRootImpact {
    pub fn new(adv_frac: f64) -> Self {
        assert!(adv_frac >= 0.0, "adv_frac must be >= 0");
        Self { adv_frac }
    }
}

impl CostModel for SquareRootImpact {
    fn cost(&self, delta: f64, volume: f64) -> f64 {
        self.adv_frac * (delta.abs() / (self.adv_frac * volume + EPSILON)).sqrt()
    }

    fn name(&self) -> &str {
        "sqrt_impact"
    }
}

/// Proportional turnover cost: `rate * |delta|`. Ignores volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCost {
    pub rate: f64,
}

impl LinearCost {
    pub fn new(rate: f64) -> Self {
        assert!(rate >= 0.0, "cost rate must be >= 0");
        Self { rate }
    }
}

impl CostModel for LinearCost {
    fn cost(&self, delta: f64, _volume: f64) -> f64 {
        self.rate * delta.abs()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Per-bar cost series for a position path traded against `volumes`.
pub fn trading_costs(
    model: &dyn CostModel,
    positions: &[f64],
    volumes: &[f64],
) -> Result<Vec<f64>, SeriesError> {
    ensure_same_len(positions, volumes)?;
    Ok(diff_from_zero(positions)
        .iter()
        .zip(volumes)
        .map(|(d, v)| model.cost(*d, *v))
        .collect())
}

/// `rate * |delta position|` per bar, for callers with no volume data.
pub fn turnover_costs(rate: f64, positions: &[f64]) -> Vec<f64> {
    diff_from_zero(positions)
        .iter()
        .map(|d| rate * d.abs())
        .collect()
}

/// Square-root impact cost per bar.
pub fn slippage(
    adv_frac: f64,
    positions: &[f64],
    volumes: &[f64],
) -> Result<Vec<f64>, SeriesError> {
    trading_costs(&SquareRootImpact::new(adv_frac), positions, volumes)
}
