//! Axis construction, edges and lookups.

mod common;

use ndhist::axis::{generic, linear, linear_bins, log10, AxisOptions};
use ndhist::testing::{assert_edges_approx_eq, assert_slice_approx_eq, DEFAULT_TOLERANCE};
use ndhist::{Axis, AxisKind, BinLookup, Coord, ErrorKind, HistError, Histogram};
use rstest::rstest;

const INF: f64 = f64::INFINITY;

fn labelled() -> AxisOptions {
    AxisOptions::builder()
        .label("MyLabel")
        .name("MyAxis")
        .build()
        .unwrap()
}

fn check_decade_axis(axis: &mut Axis) {
    assert_eq!(axis.name(), "MyAxis");
    assert_eq!(axis.label(), "MyLabel");
    axis.set_name("MyNewAxis");
    axis.set_label("MyNewLabel");
    assert_eq!(axis.name(), "MyNewAxis");
    assert_eq!(axis.label(), "MyNewLabel");
    axis.set_name("MyAxis");
    axis.set_label("MyLabel");

    assert_eq!(axis.kind(), AxisKind::ConstantWidth);
    assert!(axis.has_underflow_bin());
    assert!(axis.has_overflow_bin());
    assert!(!axis.is_extendable());
    assert_eq!(axis.nbins(), 10);
    assert_eq!(axis.total_slots(), 12);

    let inner: Vec<f64> = (0..=10).map(f64::from).collect();
    let with = |front: &[f64], back: &[f64], mid: &[f64]| {
        let mut v = front.to_vec();
        v.extend_from_slice(mid);
        v.extend_from_slice(back);
        v
    };
    let tol = DEFAULT_TOLERANCE;
    assert_slice_approx_eq(&axis.binedges().to_vec(), &with(&[-INF], &[INF], &inner), tol, "binedges");
    assert_slice_approx_eq(&axis.lower_binedges().to_vec(), &with(&[-INF], &[], &inner), tol, "lower");
    assert_slice_approx_eq(&axis.upper_binedges().to_vec(), &with(&[], &[INF], &inner), tol, "upper");

    let centers: Vec<f64> = (0..10).map(|i| i as f64 + 0.5).collect();
    assert_slice_approx_eq(&axis.bincenters().to_vec(), &with(&[-INF], &[INF], &centers), tol, "centers");
    assert_slice_approx_eq(&axis.binwidths().to_vec(), &with(&[INF], &[INF], &[1.0; 10]), tol, "widths");
}

#[test]
fn constant_width_axis() {
    let mut axis = linear(0.0, 10.0, 1.0, &labelled()).unwrap();
    check_decade_axis(&mut axis);

    // Same checks once the axis lives in a histogram.
    let h = Histogram::<f64>::new(vec![axis]).unwrap();
    let mut axis = h.axes()[0].clone();
    check_decade_axis(&mut axis);
}

#[rstest]
#[case(0.0, 10.0, 1.0, 10)]
#[case(0.0, 10.0, 3.0, 4)]
#[case(-2.0, 3.0, 1.0, 5)]
#[case(0.0, 3.0, 0.1, 30)]
fn linear_bin_counts(#[case] start: f64, #[case] stop: f64, #[case] width: f64, #[case] nbins: usize) {
    let axis = linear(start, stop, width, &AxisOptions::default()).unwrap();
    assert_eq!(axis.nbins(), nbins);
    assert_eq!(axis.total_slots(), nbins + 2);
    let edges = axis.binedges();
    assert!((edges[nbins + 1] - stop).abs() < 1e-9);
}

#[test]
fn linear_bins_keeps_width() {
    let axis = linear_bins(1.0, 4, 0.5, &common::no_oor()).unwrap();
    assert_edges_approx_eq(&axis, &[1.0, 1.5, 2.0, 2.5, 3.0], DEFAULT_TOLERANCE);
}

#[test]
fn log10_axis() {
    let axis = log10(0.1, 100.0, 0.1, &AxisOptions::default()).unwrap();
    assert_eq!(axis.kind(), AxisKind::Log10);
    assert_eq!(axis.total_slots(), 32);
    assert_eq!(axis.bin_index_for(&Coord::Float(0.1)), Some(BinLookup::Normal(0)));
    assert_eq!(axis.bin_index_for(&Coord::Float(0.2)), Some(BinLookup::Normal(3)));
    assert_eq!(axis.bin_index_for(&Coord::Float(99.0)), Some(BinLookup::Normal(29)));
    assert_eq!(axis.bin_index_for(&Coord::Float(0.0)), Some(BinLookup::Underflow));
    assert_eq!(axis.bin_index_for(&Coord::Float(100.0)), Some(BinLookup::Overflow));

    let edges = axis.edges();
    assert!((edges[10].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn generic_axis_uses_order_only() {
    let axis = generic(["apple", "kiwi", "plum"], &AxisOptions::default()).unwrap();
    assert_eq!(axis.kind(), AxisKind::Generic);
    assert_eq!(axis.bin_index_for(&Coord::from("banana")), Some(BinLookup::Normal(0)));
    assert_eq!(axis.bin_index_for(&Coord::from("kiwi")), Some(BinLookup::Normal(1)));
    assert_eq!(axis.bin_index_for(&Coord::from("aardvark")), Some(BinLookup::Underflow));
    assert_eq!(axis.bin_index_for(&Coord::from("plum")), Some(BinLookup::Overflow));
    assert_eq!(axis.bin_index_for(&Coord::Float(1.0)), None);
    assert!(axis.binedges().iter().skip(1).take(3).all(|e| e.is_nan()));
}

#[derive(Debug, PartialEq, PartialOrd)]
struct Version(u32, u32);

#[test]
fn generic_axis_over_user_keys() {
    let edges = vec![
        Coord::key(Version(1, 0)),
        Coord::key(Version(1, 5)),
        Coord::key(Version(2, 0)),
    ];
    let axis = generic(edges, &common::no_oor()).unwrap();
    assert_eq!(axis.bin_index_for(&Coord::key(Version(1, 7))), Some(BinLookup::Normal(1)));
    assert_eq!(axis.bin_index_for(&Coord::key(Version(0, 9))), Some(BinLookup::Underflow));
    assert_eq!(axis.bin_index_for(&Coord::from(3.0)), None);
}

#[rstest]
#[case(vec![0.0], ErrorKind::Configuration)]
#[case(vec![0.0, 1.0, 1.0], ErrorKind::Configuration)]
#[case(vec![2.0, 1.0], ErrorKind::Configuration)]
fn invalid_generic_edges(#[case] edges: Vec<f64>, #[case] kind: ErrorKind) {
    let err = generic(edges, &AxisOptions::default()).unwrap_err();
    assert_eq!(err.kind(), kind);
}

#[test]
fn invalid_options() {
    let result = AxisOptions::builder().extendable(true).oor_bins(true).build();
    assert!(matches!(result, Err(HistError::ExtendableWithBoundaryBins)));

    let err = linear(0.0, 1.0, 0.0, &AxisOptions::default()).unwrap_err();
    assert!(matches!(err, HistError::InvalidWidth { .. }));
}

#[test]
fn extendable_axis_has_no_boundary_bins() {
    let axis = linear(0.0, 10.0, 1.0, &common::extendable(10)).unwrap();
    assert!(axis.is_extendable());
    assert!(!axis.has_underflow_bin());
    assert!(!axis.has_overflow_bin());
    assert_eq!(axis.total_slots(), 10);
    assert_eq!(axis.max_back_capacity(), 10);
    assert_eq!(axis.bin_index_for(&Coord::Float(10.0)), Some(BinLookup::ExtendAfter(1)));
    assert_eq!(axis.bin_index_for(&Coord::Float(-0.5)), Some(BinLookup::ExtendBefore(1)));
    assert_eq!(axis.bin_index_for(&Coord::Float(f64::INFINITY)), Some(BinLookup::OutOfRange));
}
