//! EdgeLab Core: numeric kernels and stateful simulators for strategy analytics.
//!
//! This crate contains the per-series building blocks:
//! - Domain types (bars, bar series) and the shared series helpers
//! - IndicatorEngine: moving averages, EMA/Wilder smoothing, RSI, ATR, Bollinger, %K, OBV, VWAP
//! - SignalEngine: crossings, thresholds, forward fill, minimum hold
//! - ExecutionSimulator: return attribution, cost models, stop-loss state machine
//! - RiskOverlay: vol targeting, Kelly sizing, caps, drawdown control, circuit breaker
//! - CrossSectionalUniverse: row-wise rank/score/weight transforms across assets
//!
//! Everything here is deterministic and single-pass. Stateful simulators own
//! their state for one call only.

pub mod config;
pub mod domain;
pub mod execution;
pub mod indicators;
pub mod risk;
pub mod signals;
pub mod universe;

pub use config::ConfigError;
pub use domain::{Bar, BarError, BarSeries, SeriesError, EPSILON, TRADING_DAYS};
pub use execution::{Attribution, ExecutionConfig};
pub use indicators::Indicator;
pub use risk::RiskConfig;
pub use universe::UniverseError;
