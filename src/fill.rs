//! Filling entries into a histogram.
//!
//! Each entry is classified on every axis first. If any axis routes it to a
//! boundary bin the axis does not have, or beyond the outer edge of a
//! boundary bin, the entry is discarded and nothing is touched, not even
//! extendable axes. Otherwise extendable axes grow to include their
//! coordinate, the bin store grows along with them, and the entry is
//! accumulated.
//!
//! Batch-level preconditions (dimensionality, column and weight lengths) are
//! checked before any entry is recorded. An entry whose coordinate cannot be
//! ordered stops the batch with [`HistError::Unordered`], and one that would
//! grow an axis past [`MAX_EXTENDED_BINS`] stops it with
//! [`HistError::ExtensionTooLarge`]; entries before it stay recorded.
//!
//! # Fill forms
//!
//! - [`Histogram::fill`]: one column per axis, up to [`MAX_TUPLE_FILL_NDIM`] axes
//! - [`Histogram::fill_named`]: columns keyed by axis name, any dimensionality
//! - [`Histogram::fill_point`]: a single coordinate tuple

use crate::axis::{BinLookup, MAX_EXTENDED_BINS};
use crate::coord::{Coord, CoordColumn, Weights};
use crate::error::{HistError, Result};
use crate::histogram::Histogram;
use crate::value::BinValue;

/// Maximum dimensionality accepted by the columnar [`Histogram::fill`].
pub const MAX_TUPLE_FILL_NDIM: usize = 16;

/// Outcome of a fill call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillStats {
    /// Entries accumulated into some bin.
    pub filled: usize,
    /// Entries dropped because they fell outside a non-extendable range.
    pub discarded: usize,
}

/// Reused per-batch buffers.
#[derive(Default)]
struct Scratch {
    coords: Vec<Coord>,
    lookups: Vec<BinLookup>,
    index: Vec<usize>,
    physical: Vec<usize>,
}

impl<V: BinValue> Histogram<V> {
    /// Fills a batch given as one coordinate column per axis.
    ///
    /// # Errors
    ///
    /// - [`HistError::TupleFillLimit`] above [`MAX_TUPLE_FILL_NDIM`] axes
    /// - [`HistError::DimensionMismatch`] if the column count differs from `ndim`
    /// - [`HistError::ColumnLength`] / [`HistError::WeightLength`] on length mismatch
    /// - [`HistError::Unordered`] for an entry that cannot be classified
    /// - [`HistError::AliasedStorage`] if an axis must grow while a view
    ///   aliases the bins
    pub fn fill(&mut self, columns: &[CoordColumn<'_>], weights: Weights<'_, V>) -> Result<FillStats> {
        if columns.len() > MAX_TUPLE_FILL_NDIM {
            return Err(HistError::TupleFillLimit {
                max: MAX_TUPLE_FILL_NDIM,
                got: columns.len(),
            });
        }
        self.fill_columns(columns, weights)
    }

    /// Fills a record batch whose columns are keyed by axis name.
    ///
    /// Columns that match no axis are ignored.
    pub fn fill_named(
        &mut self,
        record: &[(&str, CoordColumn<'_>)],
        weights: Weights<'_, V>,
    ) -> Result<FillStats> {
        let columns = self
            .axes
            .iter()
            .map(|axis| {
                record
                    .iter()
                    .find(|(name, _)| *name == axis.name())
                    .map(|(_, column)| *column)
                    .ok_or_else(|| HistError::MissingColumn {
                        name: axis.name().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        self.fill_columns(&columns, weights)
    }

    /// Fills a single entry.
    pub fn fill_point<C>(&mut self, point: &[C], weight: V) -> Result<FillStats>
    where
        C: Clone + Into<Coord>,
    {
        let coords: Vec<Coord> = point.iter().cloned().map(Into::into).collect();
        let columns: Vec<CoordColumn<'_>> = coords
            .chunks(1)
            .map(CoordColumn::Coords)
            .collect();
        self.fill_columns(&columns, Weights::Scalar(weight))
    }

    fn fill_columns(
        &mut self,
        columns: &[CoordColumn<'_>],
        weights: Weights<'_, V>,
    ) -> Result<FillStats> {
        let n = self.validate_batch(columns, &weights)?;
        let mut scratch = Scratch::default();
        let mut stats = FillStats::default();

        for entry in 0..n {
            scratch.coords.clear();
            scratch.coords.extend(columns.iter().map(|c| c.get(entry)));
            let recorded = self
                .fill_entry(&mut scratch, weights.at(entry))
                .map_err(|e| match e {
                    HistError::Unordered { axis, .. } => HistError::Unordered { entry, axis },
                    other => other,
                })?;
            if recorded {
                stats.filled += 1;
            } else {
                stats.discarded += 1;
            }
        }
        if stats.discarded > 0 {
            log::trace!(
                "fill discarded {} of {} entries outside the axis ranges",
                stats.discarded,
                n
            );
        }
        Ok(stats)
    }

    /// Checks the batch shape and returns the number of entries.
    fn validate_batch(&self, columns: &[CoordColumn<'_>], weights: &Weights<'_, V>) -> Result<usize> {
        if columns.len() != self.ndim() {
            return Err(HistError::DimensionMismatch {
                expected: self.ndim(),
                got: columns.len(),
            });
        }
        let n = match columns.first() {
            Some(column) => column.len(),
            None => weights.batch_len().unwrap_or(1),
        };
        for (axis, column) in columns.iter().enumerate() {
            if column.len() != n {
                return Err(HistError::ColumnLength {
                    axis,
                    expected: n,
                    got: column.len(),
                });
            }
        }
        if let Some(len) = weights.batch_len() {
            if len != n {
                return Err(HistError::WeightLength { expected: n, got: len });
            }
        }
        Ok(n)
    }

    /// Classifies and accumulates one entry. Returns `false` if it was discarded.
    fn fill_entry(&mut self, scratch: &mut Scratch, weight: V) -> Result<bool> {
        scratch.lookups.clear();
        for (axis_index, (axis, coord)) in self.axes.iter().zip(&scratch.coords).enumerate() {
            let lookup = axis.bin_index_for(coord).ok_or(HistError::Unordered {
                entry: 0,
                axis: axis_index,
            })?;
            let keeps = match lookup {
                BinLookup::Underflow | BinLookup::Overflow => axis.slot(lookup).is_some(),
                BinLookup::OutOfRange => false,
                BinLookup::ExtensionTooLarge => {
                    return Err(HistError::ExtensionTooLarge {
                        axis: axis_index,
                        max: MAX_EXTENDED_BINS,
                    })
                }
                _ => true,
            };
            if !keeps {
                return Ok(false);
            }
            scratch.lookups.push(lookup);
        }

        for d in 0..self.axes.len() {
            let lookup = scratch.lookups[d];
            if matches!(lookup, BinLookup::ExtendBefore(_) | BinLookup::ExtendAfter(_)) {
                if !self.store.is_exclusive() {
                    return Err(HistError::AliasedStorage);
                }
                let extension = self.axes[d].apply_extension(lookup);
                self.store.grow(d, extension)?;
                log::debug!(
                    "axis `{}` extended by {:?} to {} bins",
                    self.axes[d].name(),
                    extension,
                    self.axes[d].nbins()
                );
                scratch.lookups[d] = self.axes[d]
                    .bin_index_for(&scratch.coords[d])
                    .ok_or(HistError::Unordered { entry: 0, axis: d })?;
            }
        }

        scratch.index.clear();
        for (axis, &lookup) in self.axes.iter().zip(&scratch.lookups) {
            match axis.slot(lookup) {
                Some(slot) => scratch.index.push(slot),
                None => return Ok(false),
            }
        }
        self.store.accumulate(&scratch.index, weight, &mut scratch.physical);
        Ok(true)
    }
}
