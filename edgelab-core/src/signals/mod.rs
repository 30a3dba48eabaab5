//! SignalEngine: turns indicator series into event and position series.

pub mod crossing;
pub mod position;

pub use crossing::{
    cross_down, cross_up, long_only_trend, threshold_down, threshold_up, trend_direction,
};
pub use position::{fill, hold, HoldState};
