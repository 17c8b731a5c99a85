//! Shared fixtures for integration tests.

#![allow(dead_code)]

use ndhist::axis::{linear, AxisOptions};
use ndhist::{CoordColumn, Histogram, Weights};

/// `[0, 1, ..., 9, 10, 10, 10]`: one entry per bin of `linear(0, 10, 1)`
/// plus three at the upper edge.
pub fn decade_values() -> Vec<f64> {
    let mut values: Vec<f64> = (0..=10).map(f64::from).collect();
    values.extend([10.0, 10.0]);
    values
}

pub fn no_oor() -> AxisOptions {
    AxisOptions::builder().oor_bins(false).build().unwrap()
}

pub fn extendable(extra_capacity: usize) -> AxisOptions {
    AxisOptions::builder()
        .extendable(true)
        .extra_capacity(extra_capacity)
        .build()
        .unwrap()
}

/// 1D histogram over `linear(0, 10, 1, options)` filled with [`decade_values`].
pub fn decade(options: &AxisOptions) -> Histogram<f64> {
    let mut h = Histogram::new(vec![linear(0.0, 10.0, 1.0, options).unwrap()]).unwrap();
    let values = decade_values();
    h.fill(&[CoordColumn::from(&values)], Weights::Scalar(1.0))
        .unwrap();
    h
}

/// `linear(-2, 3, 1) x linear(-1, 2, 1)` with default options.
pub fn grid_5x3() -> Histogram<f64> {
    let opts = AxisOptions::default();
    Histogram::new(vec![
        linear(-2.0, 3.0, 1.0, &opts).unwrap(),
        linear(-1.0, 2.0, 1.0, &opts).unwrap(),
    ])
    .unwrap()
}
