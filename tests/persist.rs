//! Saving and restoring histograms.

mod common;

use ndhist::axis::{generic, linear, log10, AxisOptions};
use ndhist::testing::{assert_slice_approx_eq, flat};
use ndhist::{
    AxisKind, Coord, CoordColumn, ErrorKind, HistError, Histogram, PersistError, Weights,
};
use rstest::rstest;

fn assert_same_bins(a: &Histogram<f64>, b: &Histogram<f64>) {
    assert_eq!(a.shape(), b.shape());
    assert_eq!(a.full_binentries(), b.full_binentries());
    assert_eq!(a.full_bincontent(), b.full_bincontent());
    assert_eq!(a.full_squaredweights(), b.full_squaredweights());
    for (x, y) in a.axes().iter().zip(b.axes()) {
        assert!(x.is_compatible(y), "axis `{}` changed", x.name());
        assert_eq!(x.kind(), y.kind());
        assert_eq!(x.label(), y.label());
        assert_eq!(x.name(), y.name());
        assert_eq!(x.edges(), y.edges());
        assert_eq!(x.max_front_capacity(), y.max_front_capacity());
        assert_eq!(x.max_back_capacity(), y.max_back_capacity());
    }
}

#[test]
fn roundtrip_two_dimensional() {
    let x = AxisOptions::builder().name("x").label("x [cm]").build().unwrap();
    let y = AxisOptions::builder().name("y").label("y [cm]").build().unwrap();
    let mut h = Histogram::<f64>::new(vec![
        linear(-2.0, 3.0, 1.0, &x).unwrap(),
        linear(-1.0, 2.0, 0.5, &y).unwrap(),
    ])
    .unwrap()
    .with_title("positions");
    h.fill(
        &[CoordColumn::from(&[-1.0, -0.5, 0.0, 7.0]), CoordColumn::from(&[1.0, 1.1, 0.0, -3.0])],
        Weights::from(&[1.0, 2.0, 0.5, 4.0]),
    )
    .unwrap();

    let json = h.to_json().unwrap();
    let restored = Histogram::<f64>::from_json(&json).unwrap();
    assert_eq!(restored.title(), "positions");
    assert_eq!(restored.labels(), vec!["x [cm]", "y [cm]"]);
    assert!(!restored.is_view());
    assert_same_bins(&h, &restored);
}

#[test]
fn roundtrip_extendable_axis_keeps_capacity() {
    let h = common::decade(&common::extendable(10));
    let mut restored = Histogram::<f64>::from_json(&h.to_json().unwrap()).unwrap();
    assert_same_bins(&h, &restored);
    assert!(restored.axes()[0].is_extendable());
    assert_eq!(restored.axes()[0].max_back_capacity(), 10);

    restored.fill_point(&[-2.5], 1.0).unwrap();
    assert_eq!(restored.nbins(), vec![14]);
    assert_eq!(restored.axes()[0].edges()[0], Coord::Float(-3.0));
    assert_eq!(restored.bincontent()[[0]], 1.0);
    assert_eq!(restored.bincontent()[[13]], 3.0);
}

#[test]
fn roundtrip_front_extended_axis_keeps_exact_edges() {
    let axis = linear(0.0, 1.0, 0.1, &common::extendable(0)).unwrap();
    let mut h = Histogram::<f64>::new(vec![axis]).unwrap();
    h.fill_point(&[-0.25], 1.0).unwrap();
    assert_eq!(h.nbins(), vec![13]);

    let mut restored = Histogram::<f64>::from_json(&h.to_json().unwrap()).unwrap();
    assert_eq!(restored.axes()[0].edges(), h.axes()[0].edges());
    assert!(restored.is_compatible(&h));
    restored.try_add_assign(&h).unwrap();
    assert_eq!(restored.bincontent()[[0]], 2.0);
}

#[test]
fn roundtrip_sliced_log10_axis_stays_compatible() {
    let mut h = Histogram::<f64>::new(vec![log10(0.1, 100.0, 0.1, &AxisOptions::default()).unwrap()])
        .unwrap();
    h.fill(&[CoordColumn::from(&[0.5, 2.0, 7.0])], Weights::Scalar(1.0))
        .unwrap();
    let part = h.view(&[ndhist::Selector::from(5..20)]).unwrap().deepcopy();
    let restored = Histogram::<f64>::from_json(&part.to_json().unwrap()).unwrap();
    assert_eq!(restored.axes()[0].edges(), part.axes()[0].edges());
    assert!(restored.is_compatible(&part));
    assert_eq!(restored.full_bincontent(), part.full_bincontent());
}

#[test]
fn roundtrip_log10_axis() {
    let mut h = Histogram::<f64>::new(vec![log10(0.1, 100.0, 0.1, &AxisOptions::default()).unwrap()])
        .unwrap();
    h.fill(&[CoordColumn::from(&[0.1, 0.2, 99.0])], Weights::Scalar(1.0))
        .unwrap();
    let restored = Histogram::<f64>::from_json(&h.to_json().unwrap()).unwrap();
    assert_eq!(restored.axes()[0].kind(), AxisKind::Log10);
    assert_slice_approx_eq(
        &restored.axes()[0].binedges().to_vec(),
        &h.axes()[0].binedges().to_vec(),
        1e-12,
        "log10 edges",
    );
    let content = flat(&restored.bincontent());
    assert_eq!(content.len(), 30);
    for bin in [0, 3, 29] {
        assert_eq!(content[bin], 1.0, "bin {bin}");
    }
    assert_eq!(content.iter().sum::<f64>(), 3.0);
}

#[rstest]
#[case(vec![Coord::Int(0), Coord::Int(10), Coord::Int(100)])]
#[case(vec![Coord::Float(0.0), Coord::Float(0.5), Coord::Float(2.5)])]
#[case(vec![Coord::Int(-3), Coord::Float(0.5), Coord::Int(7)])]
fn roundtrip_generic_numeric_axis(#[case] edges: Vec<Coord>) {
    let mut h = Histogram::<f64>::new(vec![generic(edges.clone(), &AxisOptions::default()).unwrap()])
        .unwrap();
    h.fill(
        &[CoordColumn::from(&[Coord::Int(1), Coord::Float(-5.0), Coord::Int(2)])],
        Weights::Scalar(1.0),
    )
    .unwrap();
    let restored = Histogram::<f64>::from_json(&h.to_json().unwrap()).unwrap();
    assert_eq!(restored.axes()[0].kind(), AxisKind::Generic);
    assert_same_bins(&h, &restored);
}

#[test]
fn roundtrip_keeps_finite_overflow_edge() {
    let merged = common::decade(&common::no_oor())
        .merge_axis_bins(0, 3)
        .unwrap();
    let mut restored = Histogram::<f64>::from_json(&merged.to_json().unwrap()).unwrap();
    assert_eq!(restored.axes()[0].overflow_edge(), Some(&Coord::Float(10.0)));
    assert_same_bins(&merged, &restored);

    let stats = restored.fill_point(&[10.5], 1.0).unwrap();
    assert_eq!(stats.discarded, 1);
}

#[test]
fn roundtrip_integer_weights() {
    let mut h = Histogram::<i64>::new(vec![linear(0.0, 4.0, 1.0, &AxisOptions::default()).unwrap()])
        .unwrap();
    h.fill(&[CoordColumn::from(&[0.5, 0.7, 3.5])], Weights::from(&[2, 3, 4]))
        .unwrap();
    let restored = Histogram::<i64>::from_json(&h.to_json().unwrap()).unwrap();
    assert_eq!(restored.full_bincontent(), h.full_bincontent());
    assert_eq!(flat(&restored.squaredweights()), vec![13, 0, 0, 16]);
}

#[test]
fn write_and_read_json() {
    let h = common::decade(&AxisOptions::default()).with_title("decade");
    let mut buffer = Vec::new();
    h.write_json(&mut buffer).unwrap();
    let restored = Histogram::<f64>::read_json(buffer.as_slice()).unwrap();
    assert_eq!(restored.title(), "decade");
    assert_same_bins(&h, &restored);
}

#[test]
fn views_are_saved_as_owning_histograms() {
    let h = common::decade(&AxisOptions::default());
    let part = h.view(&[ndhist::Selector::from(2..5)]).unwrap();
    let restored = Histogram::<f64>::from_json(&part.to_json().unwrap()).unwrap();
    assert!(!restored.is_view());
    assert_eq!(restored.shape(), vec![3]);
    assert_eq!(flat(&restored.bincontent()), vec![1.0, 1.0, 1.0]);
}

// =============================================================================
// Failures
// =============================================================================

fn hist_error(err: PersistError) -> HistError {
    match err {
        PersistError::Hist(e) => e,
        other => panic!("expected a histogram error, got {other}"),
    }
}

#[test]
fn text_edges_are_rejected() {
    let h = Histogram::<f64>::new(vec![generic(["a", "b", "c"], &AxisOptions::default()).unwrap()])
        .unwrap();
    let err = hist_error(h.to_json().unwrap_err());
    assert_eq!(err, HistError::ObjectAxis { axis: 0 });
    assert_eq!(err.kind(), ErrorKind::TypeCompatibility);
}

#[test]
fn unknown_axis_kind_is_rejected() {
    let h = common::decade(&AxisOptions::default());
    let mut snapshot = h.to_snapshot().unwrap();
    snapshot.axes[0].class_name = "variable_width_axis".to_string();
    let err = hist_error(Histogram::<f64>::from_snapshot(snapshot).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(matches!(err, HistError::UnknownAxisKind(name) if name == "variable_width_axis"));
}

#[test]
fn weight_dtype_must_match() {
    let h = common::decade(&AxisOptions::default());
    let err = hist_error(Histogram::<u32>::from_json(&h.to_json().unwrap()).unwrap_err());
    assert!(matches!(err, HistError::DtypeMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::TypeCompatibility);
}

#[test]
fn shape_must_match_axes() {
    let h = common::decade(&AxisOptions::default());
    let mut snapshot = h.to_snapshot().unwrap();
    snapshot.shape = vec![11];
    let err = hist_error(Histogram::<f64>::from_snapshot(snapshot).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn malformed_input() {
    assert!(matches!(
        Histogram::<f64>::from_json("{\"version\": 1"),
        Err(PersistError::Json(_))
    ));

    let h = common::decade(&AxisOptions::default());
    let mut snapshot = h.to_snapshot().unwrap();
    snapshot.version = 99;
    assert!(matches!(
        Histogram::<f64>::from_snapshot(snapshot),
        Err(PersistError::Validation(_))
    ));
}
