//! Convenience constructors computing edges from a range and a width.

use crate::coord::Coord;
use crate::error::{HistError, Result};

use super::uniform::bin_count;
use super::{Axis, AxisOptions};

/// Linear axis covering `[start, stop]` with bins of about `width`.
///
/// The bin count is `ceil((stop - start) / width)`; the width is then
/// adjusted so the last edge lands exactly on `stop`.
///
/// ```
/// use ndhist::axis::{linear, AxisOptions};
///
/// let axis = linear(0.0, 10.0, 1.0, &AxisOptions::default()).unwrap();
/// assert_eq!(axis.nbins(), 10);
/// assert_eq!(axis.total_slots(), 12);
/// ```
pub fn linear(start: f64, stop: f64, width: f64, options: &AxisOptions) -> Result<Axis> {
    let nbins = checked_count(start, stop, width)?;
    Axis::constant_width(start, (stop - start) / nbins as f64, nbins, options)
}

/// Linear axis of `nbins` bins of `width` starting at `start`.
pub fn linear_bins(start: f64, nbins: usize, width: f64, options: &AxisOptions) -> Result<Axis> {
    Axis::constant_width(start, width, nbins, options)
}

/// Logarithmic axis covering `[start, stop]` with bins `width` wide in
/// log10 space.
pub fn log10(start: f64, stop: f64, width: f64, options: &AxisOptions) -> Result<Axis> {
    if !(start > 0.0) {
        return Err(HistError::NonPositiveLogRange { start });
    }
    let (lo, hi) = (start.log10(), stop.log10());
    let nbins = checked_count(lo, hi, width)?;
    Axis::log10(start, (hi - lo) / nbins as f64, nbins, options)
}

/// Axis with explicit, strictly increasing edges of any ordered type.
pub fn generic<I, C>(edges: I, options: &AxisOptions) -> Result<Axis>
where
    I: IntoIterator<Item = C>,
    C: Into<Coord>,
{
    Axis::generic(edges.into_iter().map(Into::into).collect(), options)
}

fn checked_count(start: f64, stop: f64, width: f64) -> Result<usize> {
    if !start.is_finite() {
        return Err(HistError::NonFiniteEdge { index: 0 });
    }
    if !stop.is_finite() {
        return Err(HistError::NonFiniteEdge { index: 1 });
    }
    if !(width > 0.0 && width.is_finite()) {
        return Err(HistError::InvalidWidth { width });
    }
    if !(stop > start) {
        return Err(HistError::EdgesNotIncreasing { index: 1 });
    }
    Ok(bin_count(stop - start, width))
}
