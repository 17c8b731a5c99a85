//! Component benchmarks: projection, merging, views and snapshots.

#[path = "../../common/mod.rs"]
mod common;

use common::criterion_config::structural_criterion;
use common::data::{uniform_column, weights};

use ndhist::axis::{linear, AxisOptions};
use ndhist::{CoordColumn, Histogram, Selector, Weights};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn filled_3d() -> Histogram<f64> {
    let opts = AxisOptions::default();
    let axes = (0..3).map(|_| linear(0.0, 1.0, 0.02, &opts).unwrap()).collect();
    let mut h = Histogram::new(axes).unwrap();
    let n = 50_000;
    let columns: Vec<Vec<f64>> = (0..3).map(|d| uniform_column(n, 42 + d, 0.0, 1.0)).collect();
    let cols: Vec<CoordColumn<'_>> = columns.iter().map(CoordColumn::from).collect();
    let w = weights(n, 7);
    h.fill(&cols, Weights::from(&w)).unwrap();
    h
}

fn bench_structural(c: &mut Criterion) {
    let h = filled_3d();
    let mut group = c.benchmark_group("structural");

    group.bench_function("project_keep_0", |b| {
        b.iter(|| black_box(h.project(black_box(&[0])).unwrap()));
    });
    group.bench_function("merge_axis_1_by_4", |b| {
        b.iter(|| black_box(h.merge_axis_bins(1, 4).unwrap()));
    });
    group.bench_function("view_and_copy", |b| {
        b.iter(|| {
            let v = h.view(&[Selector::from(10..30), Selector::Ellipsis]).unwrap();
            black_box(v.deepcopy())
        });
    });
    group.bench_function("json_roundtrip", |b| {
        b.iter(|| {
            let json = h.to_json().unwrap();
            black_box(Histogram::<f64>::from_json(&json).unwrap())
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = structural_criterion();
    targets = bench_structural
}
criterion_main!(benches);
