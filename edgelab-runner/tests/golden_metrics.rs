//! Golden metric values on the shared 25-bar return vectors.
//!
//! R is the strategy series and B the benchmark; both match the core
//! golden scenarios. Expected values were computed independently with
//! double-precision reference code.

use edgelab_runner::metrics::{self, MetricsResult};
use edgelab_runner::overfit::{
    benjamini_hochberg, benjamini_hochberg_adjusted, hhi, phi, phi_inv, sharpe_confidence,
    OverfitConfig,
};
use edgelab_runner::rolling::{
    alpha, downside_capture, drawdown_episodes, information_ratio, rolling_beta, rolling_sharpe,
    rolling_vol, upside_capture,
};

const R: [f64; 25] = [
    0.01, -0.02, 0.03, -0.01, 0.02, -0.015, 0.025, -0.005, 0.01, -0.02, 0.015, -0.01, 0.02,
    -0.025, 0.01, 0.005, -0.01, 0.02, -0.015, 0.01, 0.005, -0.01, 0.02, -0.015, 0.01,
];

const B: [f64; 25] = [
    0.008, -0.015, 0.025, -0.008, 0.018, -0.012, 0.022, -0.004, 0.008, -0.018, 0.012, -0.009,
    0.017, -0.022, 0.009, 0.004, -0.009, 0.018, -0.013, 0.009, 0.004, -0.009, 0.018, -0.013, 0.009,
];

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "actual={actual}, expected={expected}, tol={tol}"
    );
}

// ── Performance metrics ──────────────────────────────────────────────

#[test]
fn full_metric_set_on_r() {
    let m = MetricsResult::compute(&R, &[]);
    assert_close(m.sharpe, 2.1993019197031933, 1e-9);
    assert_close(m.sortino, 3.475059654734059, 1e-9);
    assert_close(m.max_drawdown, -0.025, 1e-12);
    assert_eq!(m.max_dd_duration, 9);
    assert_close(m.total_return, 0.05316430120224358, 1e-12);
    assert_close(m.cagr, 0.6856250849586243, 1e-9);
    assert_close(m.ann_vol, 0.252079987305617, 1e-12);
    assert_close(m.calmar, 27.42500339834502, 1e-6);
    assert_close(m.win_rate, 0.56, 1e-12);
    assert_close(m.profit_factor, 1.3548387096774195, 1e-9);
    assert_close(m.avg_win, 0.015, 1e-12);
    assert_close(m.avg_loss, -0.014090909090909088, 1e-12);
    assert_close(m.expectancy, 0.0022, 1e-12);
    assert_close(m.skew, -0.04492897655926778, 1e-9);
    assert_close(m.kurtosis, -1.3005021386791724, 1e-9);
    assert_eq!(m.trades, 0);
    assert_eq!(m.time_in_market, 0.0);
}

#[test]
fn max_drawdown_three_bar_scenario() {
    // Equity 1.10, 0.88, 0.924: trough is 20% below the 1.10 peak.
    assert_close(metrics::max_drawdown(&[0.10, -0.20, 0.05]), -0.20, 1e-12);
}

#[test]
fn equity_curve_ends_at_total_return() {
    let eq = metrics::equity_curve(&R);
    assert_eq!(eq.len(), R.len());
    assert_close(eq[24] - 1.0, metrics::total_return(&R), 1e-12);
}

// ── Rolling and benchmark-relative ───────────────────────────────────

#[test]
fn rolling_windows_on_r() {
    let vol = rolling_vol(5, &R).unwrap();
    let sr = rolling_sharpe(5, &R).unwrap();
    let beta = rolling_beta(5, &R, &B).unwrap();
    assert_eq!(vol.len(), 21);
    assert_eq!(sr.len(), 21);
    assert_eq!(beta.len(), 21);
    assert_close(vol[20], 0.2286700680019141, 1e-9);
    assert_close(sr[0], 4.593220484431883, 1e-9);
    assert_close(beta[0], 1.2242403073698918, 1e-9);
}

#[test]
fn full_sample_beta_is_one_window() {
    let beta = rolling_beta(25, &R, &B).unwrap();
    assert_eq!(beta.len(), 1);
    assert_close(beta[0], 1.1616755670793477, 1e-9);
}

#[test]
fn benchmark_relative_on_r_vs_b() {
    assert_close(alpha(&R, &B, 0.0).unwrap(), -0.01143840560615006, 1e-9);
    assert_close(information_ratio(&R, &B).unwrap(), 1.5856166430030083, 1e-9);
    assert_close(upside_capture(&R, &B).unwrap(), 1.160220994475138, 1e-9);
    assert_close(downside_capture(&R, &B).unwrap(), 1.1742424242424243, 1e-9);
}

#[test]
fn drawdown_episodes_on_r() {
    let expected: [(usize, usize, Option<usize>, f64); 7] = [
        (1, 1, Some(2), -0.02),
        (3, 3, Some(4), -0.01),
        (5, 5, Some(6), -0.015),
        (7, 7, Some(8), -0.005),
        (9, 9, Some(12), -0.02),
        (13, 13, Some(22), -0.025),
        (23, 23, None, -0.015),
    ];
    let eps = drawdown_episodes(&R);
    assert_eq!(eps.len(), expected.len());
    for (ep, &(start, trough, end, depth)) in eps.iter().zip(&expected) {
        assert_eq!(ep.start, start);
        assert_eq!(ep.trough, trough);
        assert_eq!(ep.end, end);
        assert_close(ep.depth, depth, 1e-12);
    }
    // The longest episode matches the max drawdown duration.
    let longest = eps.iter().map(|e| e.duration(R.len())).max().unwrap();
    assert_eq!(longest, metrics::max_dd_duration(&R));
}

// ── Overfitting correction ───────────────────────────────────────────

#[test]
fn sharpe_confidence_on_r() {
    let c = sharpe_confidence(&R, 10, 0.0);
    assert_close(c.sharpe, 0.13854299851146654, 1e-12);
    assert_close(c.psr, 0.7518614326540437, 1e-8);
    assert_close(c.dsr, 0.18458120659769428, 1e-8);
    assert_close(c.min_trl, 345.00840323966423, 1e-5);
}

#[test]
fn deflated_sharpe_through_config() {
    let config = OverfitConfig {
        trials: 10,
        ..Default::default()
    };
    let dsr = config.deflate(&R).statistic().unwrap();
    assert_close(dsr, 0.18458120659769428, 1e-8);
}

#[test]
fn hhi_scenario() {
    assert_close(hhi(&[0.01, 0.01, 0.02]), 0.375, 1e-12);
}

#[test]
fn benjamini_hochberg_scenario() {
    let p = [0.001, 0.01, 0.05, 0.1, 0.3];
    assert_eq!(
        benjamini_hochberg(5, 0.05, &p),
        vec![true, true, false, false, false]
    );
    let adjusted = benjamini_hochberg_adjusted(&p);
    assert_close(adjusted[0], 0.005, 1e-12);
    assert_close(adjusted[1], 0.025, 1e-12);
    assert_close(adjusted[2], 0.05 * 5.0 / 3.0, 1e-12);
}

#[test]
fn normal_quantile_at_median() {
    assert_close(phi_inv(0.5), 0.0, 1e-10);
    assert_close(phi(0.0), 0.5, 1e-10);
}
