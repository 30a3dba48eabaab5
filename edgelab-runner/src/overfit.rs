//! Overfitting correction for selected strategies.
//!
//! Implements from first principles:
//! - Standard normal CDF (Hart's double-precision rational approximation)
//! - Inverse normal CDF (Acklam's rational approximation, one Halley refinement)
//! - Deflated and probabilistic Sharpe ratios, minimum track record length
//! - Herfindahl concentration of gains
//! - Benjamini-Hochberg false discovery rate control
//!
//! Sharpe ratios here are per-period (not annualized) and `t` is the number
//! of return observations behind them.

use serde::{Deserialize, Serialize};

use edgelab_core::config::{check_unit_open, check_window, ConfigError};
use edgelab_core::domain::series::{mean, population_std};
use edgelab_core::domain::EPSILON;

use crate::metrics::{kurtosis, skew};

/// Euler-Mascheroni constant.
const EULER_GAMMA: f64 = 0.5772156649;

/// Significance level behind the minimum track record length.
const MIN_TRL_ALPHA: f64 = 0.05;

// ─── Normal distribution ────────────────────────────────────────────

/// Standard normal CDF, accurate to double precision.
pub fn phi(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const NUM: [f64; 7] = [
        3.52624965998911e-02,
        0.700383064443688,
        6.37396220353165,
        33.912866078383,
        112.079291497871,
        221.213596169931,
        220.206867912376,
    ];
    #[allow(clippy::excessive_precision)]
    const DEN: [f64; 8] = [
        8.83883476483184e-02,
        1.75566716318264,
        16.064177579207,
        86.7807322029461,
        296.564248779674,
        637.333633378831,
        793.826512519948,
        440.413735824752,
    ];
    const TAIL_SPLIT: f64 = 7.07106781186547;

    if x.is_nan() {
        return f64::NAN;
    }
    let z = x.abs();
    let tail = if z > 37.0 {
        0.0
    } else {
        let e = (-z * z / 2.0).exp();
        if z < TAIL_SPLIT {
            let n = NUM.iter().fold(0.0, |acc, c| acc * z + c);
            let d = DEN.iter().fold(0.0, |acc, c| acc * z + c);
            e * n / d
        } else {
            let f = z + 1.0 / (z + 2.0 / (z + 3.0 / (z + 4.0 / (z + 0.65))));
            e / f / 2.506628274631
        }
    };
    if x <= 0.0 {
        tail
    } else {
        1.0 - tail
    }
}

/// Inverse standard normal CDF. Returns -inf/+inf at 0/1 and NaN outside [0, 1].
pub fn phi_inv(p: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    #[allow(clippy::excessive_precision)]
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    #[allow(clippy::excessive_precision)]
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    #[allow(clippy::excessive_precision)]
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let poly = |coeffs: &[f64], x: f64| coeffs.iter().fold(0.0, |acc, c| acc * x + c);
    let lower_tail = |q: f64| poly(&C, q) / (poly(&D, q) * q + 1.0);

    let x = if p < P_LOW {
        lower_tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        poly(&A, r) * q / (poly(&B, r) * r + 1.0)
    } else {
        -lower_tail((-2.0 * (1.0 - p).ln()).sqrt())
    };

    // One Halley step against the exact CDF.
    let e = phi(x) - p;
    let u = e * (2.0 * std::f64::consts::PI).sqrt() * (x * x / 2.0).exp();
    let refined = x - u / (1.0 + x * u / 2.0);
    if refined.is_finite() {
        refined
    } else {
        x
    }
}

// ─── Sharpe ratio statistics ────────────────────────────────────────

/// Standard error of a Sharpe estimate under non-normal returns. The
/// variance is clamped at 0 before the square root.
pub fn sharpe_std_error(sr: f64, skew: f64, kurtosis: f64, t: usize) -> f64 {
    let dof = t.saturating_sub(1).max(1) as f64;
    let variance = (1.0 - skew * sr + (kurtosis - 1.0) / 4.0 * sr * sr) / dof;
    variance.max(0.0).sqrt()
}

/// Expected maximum Sharpe ratio across `n` independent trials of a
/// zero-skill strategy. Zero for a single trial.
pub fn expected_max_sharpe(n: usize, t: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    let a = (1.0 - EULER_GAMMA) * phi_inv(1.0 - 1.0 / n);
    let b = EULER_GAMMA * phi_inv(1.0 - 1.0 / (n * std::f64::consts::E));
    let dof = t.saturating_sub(1).max(1) as f64;
    (a + b) * (1.0 / dof).sqrt()
}

/// Deflated Sharpe ratio: confidence that `sr` beats the best of `n` lucky trials.
pub fn deflated_sharpe(sr: f64, skew: f64, kurtosis: f64, t: usize, n: usize) -> f64 {
    let hurdle = expected_max_sharpe(n, t);
    let sigma = sharpe_std_error(sr, skew, kurtosis, t);
    phi((sr - hurdle) / sigma.max(EPSILON))
}

/// Probabilistic Sharpe ratio: confidence that `sr` beats `benchmark_sr`.
pub fn probabilistic_sharpe(
    sr: f64,
    benchmark_sr: f64,
    t: usize,
    skew: f64,
    kurtosis: f64,
) -> f64 {
    let sigma = sharpe_std_error(sr, skew, kurtosis, t);
    phi((sr - benchmark_sr) / sigma.max(EPSILON))
}

/// Observations needed before `sr` is distinguishable from zero at 95%
/// confidence, Bonferroni-adjusted for `n` trials.
pub fn min_track_record_length(n: usize, sr: f64, skew: f64, kurtosis: f64) -> f64 {
    let z = phi_inv(1.0 - MIN_TRL_ALPHA / n.max(1) as f64);
    1.0 + (1.0 - skew * sr + (kurtosis - 1.0) / 4.0 * sr * sr) * (z / sr.max(EPSILON)).powi(2)
}

/// PSR, DSR and MinTRL computed from one return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpeConfidence {
    /// Per-period Sharpe ratio (population std, eps floor)
    pub sharpe: f64,
    pub psr: f64,
    pub dsr: f64,
    pub min_trl: f64,
}

pub fn sharpe_confidence(returns: &[f64], trials: usize, benchmark_sr: f64) -> SharpeConfidence {
    let t = returns.len();
    let sr = mean(returns) / population_std(returns).max(EPSILON);
    let (sk, ku) = (skew(returns), kurtosis(returns));
    SharpeConfidence {
        sharpe: sr,
        psr: probabilistic_sharpe(sr, benchmark_sr, t, sk, ku),
        dsr: deflated_sharpe(sr, sk, ku, t, trials),
        min_trl: min_track_record_length(trials, sr, sk, ku),
    }
}

// ─── Concentration ──────────────────────────────────────────────────

/// Herfindahl index of the positive returns' shares of total gain.
/// 1.0 means a single bar produced every gain; 0.0 when there are no gains.
pub fn hhi(returns: &[f64]) -> f64 {
    let gains: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let total: f64 = gains.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    gains.iter().map(|g| (g / total).powi(2)).sum()
}

// ─── Multiple testing ───────────────────────────────────────────────

fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));
    order
}

/// Benjamini-Hochberg step-up rejection mask for `m` hypotheses.
///
/// With p-values sorted ascending, find the largest rank k (1-based) with
/// `p_(k) <= alpha * k / m` and reject every hypothesis up to that rank.
/// The mask is in the caller's order.
pub fn benjamini_hochberg(m: usize, alpha: f64, p_values: &[f64]) -> Vec<bool> {
    let mut mask = vec![false; p_values.len()];
    if m == 0 {
        return mask;
    }
    let order = ascending_order(p_values);
    let last_pass = order
        .iter()
        .enumerate()
        .filter(|(rank, &idx)| p_values[idx] <= alpha * (rank + 1) as f64 / m as f64)
        .map(|(rank, _)| rank)
        .last();
    if let Some(k) = last_pass {
        for &idx in &order[..=k] {
            mask[idx] = true;
        }
    }
    mask
}

/// Step-up adjusted p-values, in the caller's order:
/// `adj_(k) = min(p_(k) * m / k, adj_(k+1))`, capped at 1.
pub fn benjamini_hochberg_adjusted(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let mut adjusted = vec![0.0; m];
    let order = ascending_order(p_values);
    let mut running = 1.0_f64;
    for (rank, &idx) in order.iter().enumerate().rev() {
        running = running.min(p_values[idx] * m as f64 / (rank + 1) as f64);
        adjusted[idx] = running;
    }
    adjusted
}

// ─── Configuration ──────────────────────────────────────────────────

/// Output of an overfitting correction: a scalar confidence or a reject mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverfitResult {
    Statistic(f64),
    RejectMask(Vec<bool>),
}

impl OverfitResult {
    pub fn statistic(&self) -> Option<f64> {
        match self {
            OverfitResult::Statistic(v) => Some(*v),
            OverfitResult::RejectMask(_) => None,
        }
    }

    pub fn reject_mask(&self) -> Option<&[bool]> {
        match self {
            OverfitResult::RejectMask(mask) => Some(mask),
            OverfitResult::Statistic(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverfitConfig {
    /// False discovery rate for Benjamini-Hochberg
    pub alpha: f64,
    /// Number of strategy configurations tried before selection
    pub trials: usize,
}

impl Default for OverfitConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            trials: 1,
        }
    }
}

impl OverfitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_open("overfit.alpha", self.alpha)?;
        check_window("overfit.trials", self.trials)?;
        Ok(())
    }

    /// Deflated Sharpe of `returns` against this config's trial count.
    pub fn deflate(&self, returns: &[f64]) -> OverfitResult {
        OverfitResult::Statistic(sharpe_confidence(returns, self.trials, 0.0).dsr)
    }

    /// BH mask over `p_values`, with at least `trials` hypotheses in the family.
    pub fn trial_correct(&self, p_values: &[f64]) -> OverfitResult {
        let m = self.trials.max(p_values.len());
        OverfitResult::RejectMask(benjamini_hochberg(m, self.alpha, p_values))
    }
}
