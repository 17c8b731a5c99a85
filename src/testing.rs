//! Testing utilities for ndhist.
//!
//! Assertion helpers shared by unit tests, integration tests and benches.
//!
//! ```
//! use ndhist::testing::{assert_slice_approx_eq, flat};
//! use ndarray::arr2;
//!
//! let array = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
//! assert_slice_approx_eq(&flat(&array), &[1.0, 2.0, 3.0, 4.0], 1e-12, "grid");
//! ```

use approx::AbsDiffEq;
use ndarray::ArrayD;

use crate::axis::Axis;

/// Default tolerance for floating point comparisons of bin values.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Elements of `array` in logical row-major order.
pub fn flat<T: Clone>(array: &ArrayD<T>) -> Vec<T> {
    array.iter().cloned().collect()
}

/// Assert that two slices of f64 values are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
/// Infinite values must match exactly.
pub fn assert_slice_approx_eq(actual: &[f64], expected: &[f64], tolerance: f64, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let same = if a.is_infinite() || e.is_infinite() {
            a == e
        } else {
            a.abs_diff_eq(e, tolerance)
        };
        assert!(same, "{context}[{i}]: {a} != {e} (tolerance={tolerance})");
    }
}

/// Assert that the normal edges of `axis` match `expected`.
pub fn assert_edges_approx_eq(axis: &Axis, expected: &[f64], tolerance: f64) {
    let edges: Vec<f64> = axis
        .edges()
        .iter()
        .map(|c| c.as_f64().unwrap_or(f64::NAN))
        .collect();
    assert_slice_approx_eq(&edges, expected, tolerance, axis.name());
}
