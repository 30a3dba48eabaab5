//! Criterion benchmarks for runner hot paths.
//!
//! Run with: `cargo bench -p edgelab-runner`
//!
//! Benchmarks:
//! 1. Full metric set over a return series
//! 2. Single-asset pipeline
//! 3. Walk-forward optimization, sequential vs rayon
//! 4. Benjamini-Hochberg over a large p-value family

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use edgelab_core::domain::{Bar, BarSeries};
use edgelab_runner::metrics::MetricsResult;
use edgelab_runner::overfit::{benjamini_hochberg, benjamini_hochberg_adjusted};
use edgelab_runner::pipeline::{run_pipeline, PipelineConfig};
use edgelab_runner::walk_forward::{run_walk_forward, ParamGrid, WalkForwardConfig};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize, seed: u64) -> BarSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let base_date = chrono::NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let mut close = 100.0;
    let bars = (0..n)
        .map(|i| {
            let open = close;
            close *= 1.0 + rng.gen_range(-0.02..0.021);
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.005,
                low: open.min(close) * 0.995,
                close,
                volume: rng.gen_range(5e5..2e6),
            }
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

fn make_returns(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-0.03..0.03)).collect()
}

// ── 1. Metrics ───────────────────────────────────────────────────────

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for &len in &[252, 2520, 25200] {
        let returns = make_returns(len, 11);
        group.bench_with_input(BenchmarkId::new("compute", len), &len, |b, _| {
            b.iter(|| MetricsResult::compute(black_box(&returns), &[]));
        });
    }

    group.finish();
}

// ── 2. Pipeline ──────────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = PipelineConfig::default();

    for &bar_count in &[504, 2520] {
        let series = make_series(bar_count, 3);
        group.bench_with_input(BenchmarkId::new("ma_cross", bar_count), &bar_count, |b, _| {
            b.iter(|| run_pipeline(black_box(&series), &config).unwrap());
        });
    }

    group.finish();
}

// ── 3. Walk-forward ──────────────────────────────────────────────────

fn bench_walk_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_forward");
    group.sample_size(10);

    let series = make_series(2520, 42);
    let grid = ParamGrid::default();

    for parallel in [false, true] {
        let config = WalkForwardConfig::default().with_parallelism(parallel);
        let label = if parallel { "rayon" } else { "sequential" };
        group.bench_function(BenchmarkId::new("default_grid_10y", label), |b| {
            b.iter(|| run_walk_forward(black_box(&series), &grid, &config).unwrap());
        });
    }

    group.finish();
}

// ── 4. Multiple testing ──────────────────────────────────────────────

fn bench_fdr(c: &mut Criterion) {
    let mut group = c.benchmark_group("fdr");
    let mut rng = StdRng::seed_from_u64(5);
    let p_values: Vec<f64> = (0..10_000).map(|_| rng.gen_range(0.0..1.0)).collect();

    group.bench_function("bh_mask_10k", |b| {
        b.iter(|| benjamini_hochberg(p_values.len(), 0.05, black_box(&p_values)));
    });
    group.bench_function("bh_adjusted_10k", |b| {
        b.iter(|| benjamini_hochberg_adjusted(black_box(&p_values)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_metrics,
    bench_pipeline,
    bench_walk_forward,
    bench_fdr
);
criterion_main!(benches);
