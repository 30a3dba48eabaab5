//! Validation plumbing shared by the configuration structs of every component.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Window lengths must be at least one bar.
pub fn check_window(field: &'static str, n: usize) -> Result<(), ConfigError> {
    if n == 0 {
        return Err(ConfigError::invalid(field, "must be >= 1"));
    }
    Ok(())
}

/// Finite and strictly positive.
pub fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
    }
    Ok(())
}

/// Finite and >= 0.
pub fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

/// Strictly inside the open unit interval.
pub fn check_unit_open(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0 && value < 1.0) {
        return Err(ConfigError::invalid(
            field,
            format!("must be in (0, 1), got {value}"),
        ));
    }
    Ok(())
}

/// Finite and strictly negative (drawdown and loss thresholds).
pub fn check_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value >= 0.0 {
        return Err(ConfigError::invalid(field, format!("must be < 0, got {value}")));
    }
    Ok(())
}
