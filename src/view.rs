//! Views and copies.
//!
//! [`Histogram::view`] derives a histogram that aliases a sub-region of the
//! source's bins: writes through either side are visible on the other.
//! [`Histogram::deepcopy`] derives one that owns an independent copy.
//!
//! Selectors address slots, not normal bins: on an axis with an underflow
//! bin, slot 0 is the underflow bin and normal bin `i` is slot `i + 1`.
//! A sliced axis keeps its underflow (overflow) bin only if the selection
//! still contains the first (last) slot.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{HistError, Result};
use crate::histogram::{capacities, Histogram};
use crate::store::DimSelect;
use crate::value::BinValue;

/// Per-dimension selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// A single slot; removes the dimension. Negative values count from the end.
    Index(isize),
    /// Slots `start..stop`; negative bounds count from the end.
    Range {
        start: Option<isize>,
        stop: Option<isize>,
    },
    /// The whole dimension.
    All,
    /// As many [`Selector::All`] as needed to cover the remaining dimensions.
    Ellipsis,
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::Index(i as isize)
    }
}

impl From<isize> for Selector {
    fn from(i: isize) -> Self {
        Selector::Index(i)
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::Range {
            start: Some(r.start as isize),
            stop: Some(r.end as isize),
        }
    }
}

impl From<RangeFrom<usize>> for Selector {
    fn from(r: RangeFrom<usize>) -> Self {
        Selector::Range {
            start: Some(r.start as isize),
            stop: None,
        }
    }
}

impl From<RangeTo<usize>> for Selector {
    fn from(r: RangeTo<usize>) -> Self {
        Selector::Range {
            start: None,
            stop: Some(r.end as isize),
        }
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

/// Resolves `selectors` against `shape` into one concrete selector per dimension.
fn expand(selectors: &[Selector], shape: &[usize]) -> Result<Vec<DimSelect>> {
    let ellipses = selectors.iter().filter(|s| **s == Selector::Ellipsis).count();
    if ellipses > 1 {
        return Err(HistError::InvalidSelector {
            reason: "at most one ellipsis is allowed".to_string(),
        });
    }
    let explicit = selectors.len() - ellipses;
    if explicit > shape.len() {
        return Err(HistError::InvalidSelector {
            reason: format!("{explicit} selectors for {} dimensions", shape.len()),
        });
    }

    let mut out = Vec::with_capacity(shape.len());
    for selector in selectors {
        if *selector == Selector::Ellipsis {
            let fill = shape.len() - explicit;
            out.extend(std::iter::repeat(DimSelect::All).take(fill));
            continue;
        }
        let n = shape[out.len()];
        out.push(resolve(*selector, n, out.len())?);
    }
    out.resize(shape.len(), DimSelect::All);
    Ok(out)
}

fn resolve(selector: Selector, n: usize, dim: usize) -> Result<DimSelect> {
    let wrap = |i: isize| if i < 0 { i + n as isize } else { i };
    match selector {
        Selector::All | Selector::Ellipsis => Ok(DimSelect::All),
        Selector::Index(i) => {
            let k = wrap(i);
            if k < 0 || k >= n as isize {
                return Err(HistError::InvalidSelector {
                    reason: format!("index {i} out of range for dimension {dim} of {n} slots"),
                });
            }
            Ok(DimSelect::Index(k as usize))
        }
        Selector::Range { start, stop } => {
            let lo = start.map_or(0, wrap).clamp(0, n as isize) as usize;
            let hi = stop.map_or(n as isize, wrap).clamp(0, n as isize) as usize;
            if lo >= hi {
                return Err(HistError::InvalidSelector {
                    reason: format!("empty range {lo}..{hi} on dimension {dim}"),
                });
            }
            Ok(DimSelect::Range {
                start: lo,
                len: hi - lo,
            })
        }
    }
}

impl<V: BinValue> Histogram<V> {
    /// Histogram aliasing the selected slots of this one.
    ///
    /// Missing trailing selectors keep their dimension whole.
    ///
    /// ```
    /// use ndhist::axis::{linear, AxisOptions};
    /// use ndhist::{Histogram, Selector};
    ///
    /// let axis = linear(0.0, 10.0, 1.0, &AxisOptions::default()).unwrap();
    /// let mut h = Histogram::<f64>::new(vec![axis]).unwrap();
    /// h.fill_point(&[3.5], 1.0).unwrap();
    ///
    /// let mut v = h.view(&[Selector::from(3..6)]).unwrap();
    /// assert!(v.is_view());
    /// assert_eq!(v.bincontent().iter().copied().collect::<Vec<_>>(), vec![0.0, 1.0, 0.0]);
    /// v.clear();
    /// assert_eq!(h.bincontent()[[3]], 0.0);
    /// ```
    pub fn view(&self, selectors: &[Selector]) -> Result<Histogram<V>> {
        let shape = self.shape();
        let selections = expand(selectors, &shape)?;
        let axes = self
            .axes
            .iter()
            .zip(&selections)
            .filter_map(|(axis, selection)| match *selection {
                DimSelect::All => Some(axis.clone()),
                DimSelect::Range { start, len } => Some(axis.sliced(start, start + len)),
                DimSelect::Index(_) => None,
            })
            .collect();
        let store = self.store.view(&selections);
        Ok(Histogram::from_parts(axes, store, self.title.clone()))
    }

    /// Independent histogram with the same axes and a copy of the visible bins.
    pub fn deepcopy(&self) -> Histogram<V> {
        let axes = self.axes.clone();
        let store = self.store.deepcopy(&capacities(&axes));
        Histogram::from_parts(axes, store, self.title.clone())
    }
}

impl<V: BinValue> Clone for Histogram<V> {
    /// Same as [`Histogram::deepcopy`]; cloning never aliases.
    fn clone(&self) -> Self {
        self.deepcopy()
    }
}
