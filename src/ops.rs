//! Structural operations: projection and bin merging.
//!
//! Both derive new bin arrays from the visible region of a histogram by
//! summing slots, so entries, content and squared weights are conserved
//! except where a merge drops the trailing bins of an extendable axis.
//!
//! # Merge slot mapping
//!
//! Merging an axis of `n` normal bins by `g` keeps `n / g` groups:
//!
//! - underflow stays underflow
//! - normal bin `k < (n / g) * g` goes to group `k / g`
//! - the `n % g` trailing bins go to overflow, which is created if the
//!   axis had none, or are dropped on an extendable axis
//! - overflow stays overflow

use std::ops::AddAssign;

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD, Axis as NdAxis, IxDyn, Zip};

use crate::axis::Axis;
use crate::error::{HistError, Result};
use crate::histogram::{capacities, Histogram};
use crate::store::{BinArrays, BinStore};
use crate::value::BinValue;

// =============================================================================
// Array helpers
// =============================================================================

fn sum_along<T: Clone + Default + AddAssign>(array: ArrayD<T>, dim: usize) -> ArrayD<T> {
    array.fold_axis(NdAxis(dim), T::default(), |acc, x| {
        let mut sum = acc.clone();
        sum += x.clone();
        sum
    })
}

fn add_slab<T: Clone + AddAssign>(mut dst: ArrayViewMutD<'_, T>, src: ArrayViewD<'_, T>) {
    Zip::from(&mut dst).and(&src).for_each(|a, b| *a += b.clone());
}

// =============================================================================
// Projection
// =============================================================================

impl<V: BinValue> Histogram<V> {
    /// Sorted, validated list of distinct axis indices.
    fn checked_dims(&self, dims: &[usize]) -> Result<Vec<usize>> {
        let ndim = self.ndim();
        let mut sorted = Vec::with_capacity(dims.len());
        for &axis in dims {
            if axis >= ndim {
                return Err(HistError::AxisOutOfRange { axis, ndim });
            }
            if sorted.contains(&axis) {
                return Err(HistError::DuplicateAxis { axis });
            }
            sorted.push(axis);
        }
        sorted.sort_unstable();
        Ok(sorted)
    }

    /// Histogram over the axes `dims`, summing every slot of the others.
    ///
    /// Boundary bins of the kept axes keep their identity; boundary bins of
    /// the summed axes are added like normal bins. The result owns its bins.
    pub fn project(&self, dims: &[usize]) -> Result<Histogram<V>> {
        let keep = self.checked_dims(dims)?;
        let removed: Vec<usize> = (0..self.ndim()).filter(|d| !keep.contains(d)).collect();
        self.sum_out(&keep, &removed)
    }

    /// Histogram with the axes `dims` summed out.
    pub fn marginalize(&self, dims: &[usize]) -> Result<Histogram<V>> {
        let removed = self.checked_dims(dims)?;
        let keep: Vec<usize> = (0..self.ndim()).filter(|d| !removed.contains(d)).collect();
        self.sum_out(&keep, &removed)
    }

    fn sum_out(&self, keep: &[usize], removed: &[usize]) -> Result<Histogram<V>> {
        let BinArrays {
            mut entries,
            mut content,
            mut squared_weights,
        } = self.store.to_arrays();
        for &d in removed.iter().rev() {
            entries = sum_along(entries, d);
            content = sum_along(content, d);
            squared_weights = sum_along(squared_weights, d);
        }
        let axes: Vec<Axis> = keep.iter().map(|&d| self.axes[d].clone()).collect();
        let arrays = BinArrays {
            entries,
            content,
            squared_weights,
        };
        let store = BinStore::from_arrays(arrays, &capacities(&axes))?;
        log::debug!(
            "summed out axes {:?} of a {}-dimensional histogram",
            removed,
            self.ndim()
        );
        Ok(Histogram::from_parts(axes, store, self.title.clone()))
    }
}

// =============================================================================
// Merging
// =============================================================================

impl<V: BinValue> Histogram<V> {
    /// Merged axis and bins for grouping `group` bins of `axis`.
    fn merged_parts(&self, axis: usize, group: usize) -> Result<(Axis, BinArrays<V>)> {
        let ndim = self.ndim();
        let old = self
            .axes
            .get(axis)
            .ok_or(HistError::AxisOutOfRange { axis, ndim })?;
        let n = old.nbins();
        if group == 0 || group > n {
            return Err(HistError::InvalidGroupSize);
        }
        let merged = old.merged(group);
        let under = old.has_underflow_bin() as usize;
        let grouped = n / group * group;
        let targets: Vec<Option<usize>> = (0..old.total_slots())
            .map(|slot| {
                if slot < under {
                    return Some(0);
                }
                let k = slot - under;
                if k < grouped {
                    Some(under + k / group)
                } else if merged.has_overflow_bin() {
                    Some(under + merged.nbins())
                } else {
                    None
                }
            })
            .collect();

        let source = self.store.to_arrays();
        let mut shape = source.entries.shape().to_vec();
        shape[axis] = merged.total_slots();
        let mut out = BinArrays {
            entries: ArrayD::zeros(IxDyn(&shape)),
            content: ArrayD::from_elem(IxDyn(&shape), V::default()),
            squared_weights: ArrayD::from_elem(IxDyn(&shape), V::default()),
        };
        let ax = NdAxis(axis);
        for (slot, target) in targets.iter().enumerate() {
            let Some(t) = *target else {
                continue;
            };
            add_slab(out.entries.index_axis_mut(ax, t), source.entries.index_axis(ax, slot));
            add_slab(out.content.index_axis_mut(ax, t), source.content.index_axis(ax, slot));
            add_slab(
                out.squared_weights.index_axis_mut(ax, t),
                source.squared_weights.index_axis(ax, slot),
            );
        }
        log::debug!(
            "merged axis {} `{}` by {}: {} -> {} bins",
            axis,
            old.name(),
            group,
            n,
            merged.nbins()
        );
        Ok((merged, out))
    }

    /// Copy of this histogram with bins of `axis` merged in groups of `group`.
    pub fn merge_axis_bins(&self, axis: usize, group: usize) -> Result<Histogram<V>> {
        let (merged, arrays) = self.merged_parts(axis, group)?;
        let mut axes = self.axes.clone();
        axes[axis] = merged;
        let store = BinStore::from_arrays(arrays, &capacities(&axes))?;
        Ok(Histogram::from_parts(axes, store, self.title.clone()))
    }

    /// Merges bins of `axis` in groups of `group` in place.
    ///
    /// Only an owning histogram that no view aliases can be rebinned.
    pub fn rebin_axis(&mut self, axis: usize, group: usize) -> Result<()> {
        if !self.store.is_exclusive() {
            return Err(HistError::AliasedStorage);
        }
        let (merged, arrays) = self.merged_parts(axis, group)?;
        self.axes[axis] = merged;
        self.store = BinStore::from_arrays(arrays, &capacities(&self.axes))?;
        Ok(())
    }

    /// Copy with several `(axis, group)` merges applied in order.
    pub fn merge_bins(&self, groups: &[(usize, usize)]) -> Result<Histogram<V>> {
        let mut out = self.deepcopy();
        out.rebin(groups)?;
        Ok(out)
    }

    /// Applies several `(axis, group)` merges in place, in order.
    ///
    /// Stops at the first failing merge; earlier merges stay applied.
    pub fn rebin(&mut self, groups: &[(usize, usize)]) -> Result<()> {
        for &(axis, group) in groups {
            self.rebin_axis(axis, group)?;
        }
        Ok(())
    }
}
