//! RiskOverlay: transforms a raw position series into a risk-adjusted one.
//!
//! Each overlay is a pure function (or a single-pass state machine) over a
//! position series and the return series it is monitored against. The
//! stateful ones own their state for exactly one call.

pub mod circuit_breaker;
pub mod drawdown;
pub mod sizing;
pub mod vol_target;

pub use circuit_breaker::{circuit_breaker, CircuitBreakerState};
pub use drawdown::{dd_control, drawdown_series, DrawdownState};
pub use sizing::{kelly_fraction, max_position};
pub use vol_target::vol_target;

use serde::{Deserialize, Serialize};

use crate::config::{check_negative, check_positive, check_window, ConfigError};
use crate::domain::SeriesError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolTargetConfig {
    /// Annualized volatility target
    pub target: f64,
    /// Trailing window for realized volatility
    pub lookback: usize,
}

impl Default for VolTargetConfig {
    fn default() -> Self {
        Self {
            target: 0.20,
            lookback: 21,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Trailing window summed for the trip test, and the cooldown length
    pub lookback: usize,
    /// Trip level for the summed returns (negative)
    pub threshold: f64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            lookback: 21,
            threshold: -0.05,
        }
    }
}

/// Risk overlay stack. Disabled steps are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub vol_target: Option<VolTargetConfig>,
    pub max_position: Option<f64>,
    pub drawdown_threshold: Option<f64>,
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(vt) = &self.vol_target {
            check_positive("risk.vol_target.target", vt.target)?;
            check_window("risk.vol_target.lookback", vt.lookback)?;
        }
        if let Some(cap) = self.max_position {
            check_positive("risk.max_position", cap)?;
        }
        if let Some(thresh) = self.drawdown_threshold {
            check_negative("risk.drawdown_threshold", thresh)?;
        }
        if let Some(cb) = &self.circuit_breaker {
            check_window("risk.circuit_breaker.lookback", cb.lookback)?;
            check_negative("risk.circuit_breaker.threshold", cb.threshold)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the enabled overlays in order: vol target, cap, drawdown
    /// control, circuit breaker.
    ///
    /// `returns[i]` must be known at the close of bar i (e.g. the close-to-close
    /// return into bar i), so no overlay sizes bar i on later data.
    pub fn apply(&self, positions: &[f64], returns: &[f64]) -> Result<Vec<f64>, SeriesError> {
        let mut out = positions.to_vec();
        if let Some(vt) = &self.vol_target {
            out = vol_target(vt.target, &out, returns, vt.lookback)?;
        }
        if let Some(cap) = self.max_position {
            out = max_position(cap, &out);
        }
        if let Some(thresh) = self.drawdown_threshold {
            out = dd_control(thresh, &out, returns)?;
        }
        if let Some(cb) = &self.circuit_breaker {
            out = circuit_breaker(cb.lookback, cb.threshold, &out, returns)?;
        }
        Ok(out)
    }
}
