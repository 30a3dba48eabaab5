//! EdgeLab Runner: performance analytics and orchestration on top of `edgelab-core`.
//!
//! This crate provides:
//! - PerformanceMetrics: Sharpe, Sortino, drawdown, growth, win/loss and shape statistics
//! - Rolling and benchmark-relative metrics, drawdown episodes
//! - OverfitCorrector: deflated/probabilistic Sharpe, MinTRL, HHI, Benjamini-Hochberg
//! - Single-asset crossover pipeline from bars to net returns and metrics
//! - Walk-forward optimization over a moving-average parameter grid
//! - TOML engine configuration with content-hash run ids

pub mod config;
pub mod metrics;
pub mod overfit;
pub mod pipeline;
pub mod rolling;
pub mod walk_forward;

pub use config::{ConfigLoadError, EngineConfig, RunId};
pub use metrics::MetricsResult;
pub use overfit::{
    benjamini_hochberg, deflated_sharpe, sharpe_confidence, OverfitConfig, OverfitResult,
    SharpeConfidence,
};
pub use pipeline::{run_pipeline, PipelineConfig, PipelineError, PipelineResult};
pub use rolling::DrawdownEpisode;
pub use walk_forward::{
    run_walk_forward, Fold, FoldOutcome, MaCrossParams, ParamGrid, WalkForwardConfig,
    WalkForwardError, WalkForwardResult,
};
