//! ExecutionSimulator: positions plus bars in, realized per-bar returns out.
//!
//! - `ohlc`: frictionless open-to-open / close-to-close attribution, volume participation cap
//! - `slippage`: cost models charged on position changes
//! - `stop_loss`: path-dependent long stop over open-to-close bars

pub mod ohlc;
pub mod slippage;
pub mod stop_loss;

pub use ohlc::{fill_limit, run_close, run_close_aligned, run_ohlc};
pub use slippage::{
    slippage, trading_costs, turnover_costs, CostModel, LinearCost, SquareRootImpact,
};
pub use stop_loss::{StopLoss, StopLossOutcome, StopLossState};

use serde::{Deserialize, Serialize};

use crate::config::{check_non_negative, check_positive, check_unit_open, ConfigError};

/// How a position decided at the close of bar i earns its return.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribution {
    /// Paired with the close-to-close return into bar i.
    #[default]
    CloseToClose,
    /// Held from close i to close i+1.
    NextClose,
    /// Entered at open i+1, held to open i+2.
    NextOpen,
    /// Entered at open i+1, held to close i+1, under a stop-loss.
    StopLoss { pct: f64 },
}

/// Execution model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Proportional cost per unit of position change
    pub cost_rate: f64,
    /// Square-root impact participation fraction; `None` disables impact cost
    pub adv_frac: Option<f64>,
    /// Cap positions to this fraction of bar volume; `None` disables the cap
    pub participation: Option<f64>,
    pub attribution: Attribution,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            cost_rate: 0.001,
            adv_frac: None,
            participation: None,
            attribution: Attribution::CloseToClose,
        }
    }
}

impl ExecutionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("execution.cost_rate", self.cost_rate)?;
        if let Some(adv) = self.adv_frac {
            check_non_negative("execution.adv_frac", adv)?;
        }
        if let Some(frac) = self.participation {
            check_positive("execution.participation", frac)?;
        }
        if let Attribution::StopLoss { pct } = self.attribution {
            check_unit_open("execution.attribution.pct", pct)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(ExecutionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_stop_pct() {
        let cfg = ExecutionConfig {
            attribution: Attribution::StopLoss { pct: 1.5 },
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("attribution.pct"));
    }

    #[test]
    fn rejects_negative_cost() {
        let cfg = ExecutionConfig {
            cost_rate: -0.001,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_impact_fraction_is_valid() {
        let cfg = ExecutionConfig {
            adv_frac: Some(0.0),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        let cfg = ExecutionConfig {
            adv_frac: Some(-0.1),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn attribution_serde_shape() {
        let json = serde_json::to_string(&Attribution::StopLoss { pct: 0.02 }).unwrap();
        assert_eq!(json, r#"{"stop_loss":{"pct":0.02}}"#);
        let back: Attribution = serde_json::from_str(r#""next_open""#).unwrap();
        assert_eq!(back, Attribution::NextOpen);
        let back: Attribution = serde_json::from_str(r#""next_close""#).unwrap();
        assert_eq!(back, Attribution::NextClose);
    }
}
