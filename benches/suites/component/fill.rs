//! Component benchmarks: fill throughput.
//!
//! Covers batch fills on fixed and extendable axes in one to three
//! dimensions, and single-point fills.

#[path = "../../common/mod.rs"]
mod common;

use common::criterion_config::default_criterion;
use common::data::{uniform_column, weights};

use ndhist::axis::{generic, linear, AxisOptions};
use ndhist::{CoordColumn, Histogram, Weights};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const BATCH_SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn fixed_axes(ndim: usize) -> Histogram<f64> {
    let opts = AxisOptions::default();
    let axes = (0..ndim)
        .map(|_| linear(-5.0, 5.0, 0.1, &opts).unwrap())
        .collect();
    Histogram::new(axes).unwrap()
}

// =============================================================================
// Batch fills
// =============================================================================

fn bench_fill_fixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill/fixed");

    for ndim in [1usize, 2, 3] {
        for &n in &BATCH_SIZES {
            let columns: Vec<Vec<f64>> = (0..ndim)
                .map(|d| uniform_column(n, 42 + d as u64, -6.0, 6.0))
                .collect();
            let w = weights(n, 7);
            let mut h = fixed_axes(ndim);

            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{ndim}d"), n),
                &columns,
                |b, columns| {
                    let cols: Vec<CoordColumn<'_>> = columns.iter().map(CoordColumn::from).collect();
                    b.iter(|| {
                        let stats = h.fill(black_box(&cols), Weights::from(&w)).unwrap();
                        black_box(stats)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_fill_extendable(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill/extendable");

    for capacity in [0usize, 64] {
        let n = 10_000;
        let xs = uniform_column(n, 42, -50.0, 50.0);
        let opts = AxisOptions::builder()
            .extendable(true)
            .extra_capacity(capacity)
            .build()
            .unwrap();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("capacity", capacity), &xs, |b, xs| {
            b.iter(|| {
                let axis = linear(-1.0, 1.0, 0.1, &opts).unwrap();
                let mut h = Histogram::<f64>::new(vec![axis]).unwrap();
                h.fill(&[CoordColumn::from(xs)], Weights::Scalar(1.0)).unwrap();
                black_box(h)
            });
        });
    }

    group.finish();
}

fn bench_fill_generic(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill/generic");
    let n = 10_000;
    let xs = uniform_column(n, 42, 0.0, 100.0);
    let edges: Vec<f64> = (0..=100).map(|i| (i as f64).powf(1.5) / 10.0).collect();
    let mut h = Histogram::<f64>::new(vec![generic(edges, &AxisOptions::default()).unwrap()]).unwrap();

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("binary_search", |b| {
        b.iter(|| {
            let stats = h
                .fill(black_box(&[CoordColumn::from(&xs)]), Weights::Scalar(1.0))
                .unwrap();
            black_box(stats)
        });
    });

    group.finish();
}

// =============================================================================
// Single points
// =============================================================================

fn bench_fill_point(c: &mut Criterion) {
    let mut h = fixed_axes(2);
    c.bench_function("fill/point_2d", |b| {
        b.iter(|| h.fill_point(black_box(&[0.25, -1.75]), 1.0).unwrap());
    });
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_fill_fixed, bench_fill_extendable, bench_fill_generic, bench_fill_point
}
criterion_main!(benches);
