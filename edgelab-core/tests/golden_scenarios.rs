//! Golden scenarios on fixed inputs.
//!
//! The 25-bar return vectors R and B are shared with the runner's golden
//! tests; expected values were computed independently with double-precision
//! reference code.

use chrono::NaiveDate;
use edgelab_core::domain::series::{sample_std, TRADING_DAYS};
use edgelab_core::domain::{Bar, BarSeries};
use edgelab_core::execution::StopLoss;
use edgelab_core::indicators::{atr, moving_average, obv, true_range};
use edgelab_core::risk::{circuit_breaker, dd_control, drawdown_series, vol_target};
use edgelab_core::signals::{fill, hold, trend_direction};
use edgelab_core::universe::{cross_rank, cross_weight, cross_zscore, long_only, top_n};

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

fn zero_indices(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == 0.0)
        .map(|(i, _)| i)
        .collect()
}

fn series(rows: &[(f64, f64, f64, f64, f64)]) -> BarSeries {
    let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    BarSeries::new(
        rows.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close, volume))| Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume,
            })
            .collect(),
    )
    .unwrap()
}

// ── Execution ────────────────────────────────────────────────────────

#[test]
fn stop_loss_fills_at_two_percent_below_entry() {
    let bars = series(&[
        (100.0, 101.0, 99.0, 100.0, 1e6),
        (100.5, 101.0, 97.0, 97.5, 1e6),
        (97.5, 99.0, 96.0, 98.0, 1e6),
    ]);
    let out = StopLoss::new(0.02)
        .simulate(&[1.0, 1.0, 1.0], &bars)
        .unwrap();
    assert_eq!(out.triggered, vec![false, true, false]);
    // Stop price 98 against the bar-1 open of 100.5.
    assert_close(out.bar_returns[1], (98.0 - 100.5) / 100.5, 1e-12);
    assert_close(out.strategy_returns[1], out.bar_returns[1], 1e-15);
}

#[test]
fn stop_loss_entry_bar_trigger_returns_minus_pct() {
    let bars = series(&[(100.0, 100.0, 97.0, 99.0, 1e6)]);
    let out = StopLoss::new(0.02).simulate(&[1.0], &bars).unwrap();
    assert!(out.triggered[0]);
    assert_close(out.strategy_returns[0], -0.02, 1e-12);
}

// ── Indicator boundary conventions ───────────────────────────────────

#[test]
fn atr_and_obv_use_zero_previous_close() {
    let bars = series(&[
        (50.0, 52.0, 49.0, 51.0, 300.0),
        (51.0, 53.0, 50.0, 52.0, 200.0),
        (52.0, 52.5, 50.5, 51.0, 100.0),
    ]);
    let tr = true_range(&bars.highs(), &bars.lows(), &bars.closes());
    assert_close(tr[0], 52.0, 1e-12);
    assert_close(tr[1], 3.0, 1e-12);
    assert_close(tr[2], 2.0, 1e-12);

    let a = atr(&bars.highs(), &bars.lows(), &bars.closes(), 2);
    assert_eq!(a.len(), 2);
    assert_close(a[0], 27.5, 1e-12);
    assert_close(a[1], 14.75, 1e-12);

    assert_eq!(obv(&bars.closes(), &bars.volumes()), vec![300.0, 500.0, 400.0]);
}

// ── Signal chain ─────────────────────────────────────────────────────

#[test]
fn ma_trend_fill_hold_chain() {
    let closes = [10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 10.0, 12.0, 13.0, 12.0];
    let fast = moving_average(&closes, 2);
    let slow = moving_average(&closes, 3);
    // Tail-align: fast starts at bar 1, slow at bar 2.
    let fast = &fast[fast.len() - slow.len()..];
    let raw = trend_direction(fast, &slow).unwrap();
    let held = hold(&fill(&raw), 3);
    assert_eq!(held.len(), closes.len() - 2);
    // Raw: [1, 1, -1, -1, -1, 1, 1, 1]. The entry at bar 2 is held through
    // bar 4, the short accepted at bar 5 is held through bar 7.
    assert_eq!(held, vec![1.0, 1.0, 1.0, -1.0, -1.0, -1.0, 1.0, 1.0]);
}

// ── Risk ─────────────────────────────────────────────────────────────

#[test]
fn drawdown_scenario_three_bars() {
    let dd = drawdown_series(&[0.10, -0.20, 0.05]);
    let max_dd = dd.iter().copied().fold(f64::INFINITY, f64::min);
    assert_close(max_dd, -0.20, 1e-12);
    assert_close(dd[2], -0.16, 1e-12);
}

#[test]
fn drawdown_control_on_r() {
    let dd = drawdown_series(&R);
    let trough = dd.iter().copied().fold(f64::INFINITY, f64::min);
    assert_close(trough, -0.025, 1e-12);
    let out = dd_control(-0.018, &[1.0; 25], &R).unwrap();
    assert_eq!(zero_indices(&out), vec![1, 9, 13, 16]);
}

#[test]
fn vol_target_on_r_with_five_bar_window() {
    let out = vol_target(0.2, &[1.0; 25], &R, 5).unwrap();
    assert_close(out[5], 0.6075688471470743, 1e-9);
    assert_close(out[6], 0.5606399432793869, 1e-9);
    assert_close(out[8], 0.6909297620095348, 1e-9);
    let expected_last = 0.2 / (sample_std(&R[19..24]) * TRADING_DAYS.sqrt());
    assert_close(out[24], expected_last, 1e-12);
}

#[test]
fn circuit_breaker_on_r() {
    let single = circuit_breaker(1, -0.018, &[1.0; 25], &R).unwrap();
    assert_eq!(zero_indices(&single), vec![1, 9, 13]);

    let pairs = circuit_breaker(2, -0.004, &[1.0; 25], &R).unwrap();
    assert_eq!(
        zero_indices(&pairs),
        vec![9, 10, 11, 13, 14, 15, 16, 17, 19, 20, 21, 22, 24]
    );
}

// ── Cross-sectional ──────────────────────────────────────────────────

fn rb_matrix() -> Vec<Vec<f64>> {
    (0..25)
        .map(|i| vec![R[i], B[i], R[i] - B[i], 0.5 * (R[i] + B[i])])
        .collect()
}

#[test]
fn universe_row_invariants_on_golden_inputs() {
    let m = rb_matrix();
    for row in cross_zscore(&m).unwrap() {
        assert!(row.iter().sum::<f64>().abs() < 1e-8);
    }
    for row in cross_weight(&m).unwrap() {
        assert_close(row.iter().map(|x| x.abs()).sum(), 1.0, 1e-8);
    }
    for row in top_n(&m, 2).unwrap() {
        assert_eq!(row.iter().sum::<f64>(), 0.0);
    }
    for row in long_only(&m).unwrap() {
        assert!(row.iter().all(|x| *x >= 0.0));
        let s: f64 = row.iter().sum();
        assert!((s - 1.0).abs() < 1e-12 || s == 0.0);
    }
    for row in cross_rank(&m).unwrap() {
        let mut sorted = row.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
