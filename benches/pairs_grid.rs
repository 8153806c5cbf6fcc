//! Benchmarks for density estimation and full grid construction.
//!
//! Run:
//! - cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pears::core::density::{DensityEstimator, GaussianKde};
use pears::{PairsConfig, PairsPlot, Variables};
use rand::prelude::*;
use rand_distr::Normal;

const SAMPLE_LENS: [usize; 3] = [500, 2_000, 10_000];
const VAR_COUNTS: [usize; 3] = [2, 4, 6];

fn gaussian_columns(vars: usize, samples: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    (0..vars)
        .map(|k| {
            (0..samples)
                .map(|_| k as f64 + normal.sample(&mut rng))
                .collect()
        })
        .collect()
}

fn bench_kde(c: &mut Criterion) {
    let mut group = c.benchmark_group("kde");
    group.sample_size(30);
    let kde = GaussianKde::default();
    for &len in &SAMPLE_LENS {
        let cols = gaussian_columns(2, len, 1);
        group.bench_with_input(BenchmarkId::new("estimate_1d", len), &cols, |b, cols| {
            b.iter(|| black_box(kde.estimate_1d(black_box(&cols[0])).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("estimate_2d", len), &cols, |b, cols| {
            b.iter(|| {
                black_box(
                    kde.estimate_2d(black_box(&cols[0]), black_box(&cols[1]))
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    group.sample_size(10);
    let plot = PairsPlot::new(PairsConfig::default());
    for &vars in &VAR_COUNTS {
        let cols = gaussian_columns(vars, 2_000, 2);
        group.bench_with_input(BenchmarkId::new("render", vars), &cols, |b, cols| {
            b.iter(|| black_box(plot.render(cols, &Variables::default()).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kde, bench_grid);
criterion_main!(benches);
