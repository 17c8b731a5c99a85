//! Bin merging on one and two dimensions.

mod common;

use ndhist::axis::{linear, AxisOptions};
use ndhist::testing::{assert_edges_approx_eq, flat};
use ndhist::{CoordColumn, HistError, Histogram, Weights};
use rstest::rstest;

#[test]
fn merge_with_boundary_bins() {
    let h = common::decade(&AxisOptions::default());
    assert_eq!(flat(&h.overflow()[0]), vec![3.0]);

    let merged = h.merge_axis_bins(0, 3).unwrap();
    assert_eq!(merged.shape(), vec![5]);
    assert_eq!(merged.nbins(), vec![3]);
    assert_eq!(flat(&merged.bincontent()), vec![3.0, 3.0, 3.0]);
    assert_eq!(flat(&merged.overflow()[0]), vec![4.0]);
    assert_eq!(flat(&merged.underflow()[0]), vec![0.0]);
    assert_edges_approx_eq(&merged.axes()[0], &[0.0, 3.0, 6.0, 9.0], 1e-12);
}

#[test]
fn merge_extendable_axis_drops_remainder() {
    let h = common::decade(&common::extendable(10));
    assert_eq!(h.nbins(), vec![11]);

    let merged = h.merge_axis_bins(0, 3).unwrap();
    assert_eq!(merged.shape(), vec![3]);
    assert!(!merged.axes()[0].has_overflow_bin());
    assert!(merged.axes()[0].is_extendable());
    assert_eq!(flat(&merged.bincontent()), vec![3.0, 3.0, 3.0]);

    // the merged axis still extends
    let mut merged = merged;
    merged.fill_point(&[14.0], 1.0).unwrap();
    assert_eq!(merged.nbins(), vec![5]);
}

#[test]
fn merge_without_boundary_bins_creates_overflow() {
    let h = common::decade(&common::no_oor());
    assert_eq!(flat(&h.bincontent()), vec![1.0; 10]);

    let merged = h.merge_axis_bins(0, 3).unwrap();
    assert_eq!(merged.shape(), vec![4]);
    assert!(!merged.axes()[0].has_underflow_bin());
    assert!(merged.axes()[0].has_overflow_bin());
    assert_eq!(flat(&merged.overflow()[0]), vec![1.0]);
    assert_eq!(
        merged.axes()[0].binedges().to_vec(),
        vec![0.0, 3.0, 6.0, 9.0, 10.0]
    );

    // the created overflow bin is bounded by the old last edge
    let mut merged = merged;
    let stats = merged.fill_point(&[10.5], 1.0).unwrap();
    assert_eq!(stats.discarded, 1);
    merged.fill_point(&[9.5], 1.0).unwrap();
    assert_eq!(flat(&merged.overflow()[0]), vec![2.0]);
}

#[test]
fn merge_two_dimensional() {
    let opts = AxisOptions::default();
    let mut h = Histogram::<f64>::new(vec![
        linear(0.0, 10.0, 1.0, &opts).unwrap(),
        linear(0.0, 5.0, 1.0, &opts).unwrap(),
    ])
    .unwrap();
    let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 10.0, 10.0];
    let ys = [0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 5.0, -1.0, -0.2, 5.0, 6.0, 0.0, 1.0];
    h.fill(&[CoordColumn::from(&xs), CoordColumn::from(&ys)], Weights::Scalar(1.0))
        .unwrap();

    assert_eq!(flat(&h.overflow()[0]), vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let mut under_y = vec![0.0; 12];
    under_y[8] = 1.0;
    under_y[9] = 1.0;
    assert_eq!(flat(&h.underflow()[1]), under_y);
    let mut over_y = vec![0.0; 12];
    for slot in [7, 10, 11] {
        over_y[slot] = 1.0;
    }
    assert_eq!(flat(&h.overflow()[1]), over_y);

    let merged = h.merge_axis_bins(0, 3).unwrap();
    assert_eq!(merged.shape(), vec![5, 7]);
    assert_eq!(
        flat(&merged.bincontent()),
        vec![
            1.0, 1.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 2.0, //
            0.0, 0.0, 0.0, 0.0, 0.0,
        ]
    );
    assert_eq!(flat(&merged.underflow()[1]), vec![0.0, 0.0, 0.0, 2.0, 0.0]);
    assert_eq!(flat(&merged.overflow()[0]), vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
    assert_eq!(flat(&merged.overflow()[1]), vec![0.0, 0.0, 0.0, 1.0, 2.0]);
    assert_eq!(merged.full_binentries().sum(), 13);
}

#[test]
fn rebin_in_place() {
    let mut h = common::decade(&AxisOptions::default());
    h.rebin(&[(0, 5)]).unwrap();
    assert_eq!(flat(&h.bincontent()), vec![5.0, 5.0]);
    assert_eq!(flat(&h.full_binentries()), vec![0, 5, 5, 3]);
    assert_eq!(flat(&h.full_squaredweights()), vec![0.0, 5.0, 5.0, 3.0]);
}

#[rstest]
#[case(0, 0, HistError::InvalidGroupSize)]
#[case(0, 11, HistError::InvalidGroupSize)]
#[case(1, 2, HistError::AxisOutOfRange { axis: 1, ndim: 1 })]
fn invalid_merges(#[case] axis: usize, #[case] group: usize, #[case] expected: HistError) {
    let h = common::decade(&AxisOptions::default());
    assert_eq!(h.merge_axis_bins(axis, group).unwrap_err(), expected);
    assert_eq!(h.nbins(), vec![10]);
}

#[test]
fn merge_of_view_leaves_source_alone() {
    let h = common::decade(&AxisOptions::default());
    let view = h.view(&[ndhist::Selector::from(1..11)]).unwrap();
    let merged = view.merge_axis_bins(0, 2).unwrap();
    assert!(!merged.is_view());
    assert_eq!(flat(&merged.bincontent()), vec![2.0; 5]);

    let mut view = view;
    assert_eq!(view.rebin_axis(0, 2), Err(HistError::AliasedStorage));
}
