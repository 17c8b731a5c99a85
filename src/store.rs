//! Dense multi-dimensional bin storage.
//!
//! A [`BinStore`] holds three parallel arrays over the full slot shape of a
//! histogram: `entries` (counts), `content` (sum of weights) and
//! `squared_weights` (sum of squared weights).
//!
//! # Ownership
//!
//! The backing arrays live in a reference-counted buffer. An owning store
//! maps every dimension in full; a view maps a sub-range or a single index
//! per dimension of the same buffer, so writes through a view are visible
//! through the owner and vice versa. The buffer is freed when the last
//! store referring to it is dropped.
//!
//! Growing a dimension (axis extension) or replacing the buffer is only
//! allowed on an owning store that no view aliases.
//!
//! # Layout
//!
//! Each dimension keeps free slots before and after its logical range (see
//! [`Headroom`]) so extendable axes grow without copying on every call.
//! Free slots are always zero.

use std::cell::RefCell;
use std::mem;
use std::ops::Div;
use std::rc::Rc;

use ndarray::{ArrayBase, ArrayD, ArrayViewD, ArrayViewMutD, Axis, IxDyn, RawData, Slice, Zip};

use crate::axis::Extension;
use crate::error::{HistError, Result};
use crate::headroom::Headroom;
use crate::value::BinValue;

// =============================================================================
// Owned and borrowed array triples
// =============================================================================

/// Owned copy of the three bin arrays.
#[derive(Debug, Clone)]
pub struct BinArrays<V> {
    pub entries: ArrayD<u64>,
    pub content: ArrayD<V>,
    pub squared_weights: ArrayD<V>,
}

/// Read access to the visible region of a store.
pub(crate) struct Region<'a, V> {
    pub entries: ArrayViewD<'a, u64>,
    pub content: ArrayViewD<'a, V>,
    pub squared_weights: ArrayViewD<'a, V>,
}

/// Write access to the visible region of a store.
pub(crate) struct RegionMut<'a, V> {
    pub entries: ArrayViewMutD<'a, u64>,
    pub content: ArrayViewMutD<'a, V>,
    pub squared_weights: ArrayViewMutD<'a, V>,
}

impl<'a, V: Clone> Region<'a, V> {
    pub(crate) fn to_arrays(&self) -> BinArrays<V> {
        BinArrays {
            entries: self.entries.to_owned(),
            content: self.content.to_owned(),
            squared_weights: self.squared_weights.to_owned(),
        }
    }
}

// =============================================================================
// Buffer and mapping
// =============================================================================

#[derive(Debug)]
struct BinBuffer<V> {
    entries: ArrayD<u64>,
    content: ArrayD<V>,
    squared_weights: ArrayD<V>,
    /// Logical length per dimension.
    shape: Vec<usize>,
    headroom: Vec<Headroom>,
}

impl<V: Clone + Default> BinBuffer<V> {
    fn zeroed(shape: Vec<usize>, headroom: Vec<Headroom>) -> Self {
        let physical: Vec<usize> = shape
            .iter()
            .zip(&headroom)
            .map(|(&n, h)| h.front() + n + h.back())
            .collect();
        Self {
            entries: ArrayD::zeros(IxDyn(&physical)),
            content: ArrayD::from_elem(IxDyn(&physical), V::default()),
            squared_weights: ArrayD::from_elem(IxDyn(&physical), V::default()),
            shape,
            headroom,
        }
    }

    /// Physical `[start, end)` of the full logical range per dimension.
    fn logical_windows(&self) -> Vec<(usize, usize)> {
        self.shape
            .iter()
            .zip(&self.headroom)
            .map(|(&n, h)| (h.front(), h.front() + n))
            .collect()
    }
}

/// How one buffer dimension is mapped into a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DimMap {
    /// The whole logical range, following growth.
    Full,
    Range { start: usize, len: usize },
    /// A single slot; the dimension is dropped from the store's shape.
    Index(usize),
}

/// Per-dimension selection used to derive a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DimSelect {
    All,
    Range { start: usize, len: usize },
    Index(usize),
}

/// Restricts `array` to `windows` and drops the dimensions mapped to an index.
fn carve<S: RawData>(
    mut array: ArrayBase<S, IxDyn>,
    windows: &[(usize, usize)],
    mapping: &[DimMap],
) -> ArrayBase<S, IxDyn> {
    for (d, &(start, end)) in windows.iter().enumerate() {
        array.slice_axis_inplace(Axis(d), Slice::from(start..end));
    }
    for d in (0..mapping.len()).rev() {
        if let DimMap::Index(_) = mapping[d] {
            array = array.index_axis_move(Axis(d), 0);
        }
    }
    array
}

// =============================================================================
// BinStore
// =============================================================================

/// Dense bin arrays, owned or aliasing another store.
#[derive(Debug)]
pub struct BinStore<V> {
    buffer: Rc<RefCell<BinBuffer<V>>>,
    mapping: Vec<DimMap>,
    is_view: bool,
}

impl<V: BinValue> BinStore<V> {
    /// Zero-initialized owning store. `capacity` gives the free slots kept
    /// before and after each dimension.
    pub fn allocate(shape: &[usize], capacity: &[(usize, usize)]) -> Self {
        let headroom = (0..shape.len())
            .map(|d| {
                let (front, back) = capacity.get(d).copied().unwrap_or_default();
                Headroom::new(front, back)
            })
            .collect();
        Self::owning(BinBuffer::zeroed(shape.to_vec(), headroom))
    }

    /// Owning store initialized from `arrays`, which must share one shape.
    pub fn from_arrays(arrays: BinArrays<V>, capacity: &[(usize, usize)]) -> Result<Self> {
        let shape = arrays.entries.shape().to_vec();
        for other in [arrays.content.shape(), arrays.squared_weights.shape()] {
            if other != shape.as_slice() {
                return Err(HistError::ShapeMismatch {
                    expected: shape,
                    got: other.to_vec(),
                });
            }
        }
        Ok(Self::from_parts(arrays, capacity))
    }

    /// Like [`from_arrays`](Self::from_arrays) for arrays known to agree.
    fn from_parts(arrays: BinArrays<V>, capacity: &[(usize, usize)]) -> Self {
        if capacity.iter().all(|&(front, back)| front == 0 && back == 0) {
            let shape = arrays.entries.shape().to_vec();
            let headroom = vec![Headroom::default(); shape.len()];
            return Self::owning(BinBuffer {
                entries: arrays.entries,
                content: arrays.content,
                squared_weights: arrays.squared_weights,
                shape,
                headroom,
            });
        }
        let store = Self::allocate(arrays.entries.shape(), capacity);
        store.write(|mut dst| {
            dst.entries.assign(&arrays.entries);
            dst.content.assign(&arrays.content);
            dst.squared_weights.assign(&arrays.squared_weights);
        });
        store
    }

    fn owning(buffer: BinBuffer<V>) -> Self {
        let mapping = vec![DimMap::Full; buffer.shape.len()];
        Self {
            buffer: Rc::new(RefCell::new(buffer)),
            mapping,
            is_view: false,
        }
    }

    // =========================================================================
    // Shape and ownership
    // =========================================================================

    /// Visible shape; dimensions mapped to a single index are dropped.
    pub fn shape(&self) -> Vec<usize> {
        let buf = self.buffer.borrow();
        self.mapping
            .iter()
            .zip(&buf.shape)
            .filter_map(|(m, &n)| match *m {
                DimMap::Full => Some(n),
                DimMap::Range { len, .. } => Some(len),
                DimMap::Index(_) => None,
            })
            .collect()
    }

    pub fn ndim(&self) -> usize {
        self.mapping
            .iter()
            .filter(|m| !matches!(m, DimMap::Index(_)))
            .count()
    }

    pub fn is_view(&self) -> bool {
        self.is_view
    }

    /// Whether this store owns its buffer and no view aliases it.
    pub fn is_exclusive(&self) -> bool {
        !self.is_view && Rc::strong_count(&self.buffer) == 1
    }

    fn windows(&self, buf: &BinBuffer<V>) -> Vec<(usize, usize)> {
        self.mapping
            .iter()
            .enumerate()
            .map(|(d, m)| {
                let offset = buf.headroom[d].front();
                match *m {
                    DimMap::Full => (offset, offset + buf.shape[d]),
                    DimMap::Range { start, len } => (offset + start, offset + start + len),
                    DimMap::Index(i) => (offset + i, offset + i + 1),
                }
            })
            .collect()
    }

    // =========================================================================
    // Region access
    // =========================================================================

    pub(crate) fn read<R>(&self, f: impl FnOnce(Region<'_, V>) -> R) -> R {
        let buf = self.buffer.borrow();
        let windows = self.windows(&buf);
        f(Region {
            entries: carve(buf.entries.view(), &windows, &self.mapping),
            content: carve(buf.content.view(), &windows, &self.mapping),
            squared_weights: carve(buf.squared_weights.view(), &windows, &self.mapping),
        })
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(RegionMut<'_, V>) -> R) -> R {
        let mut guard = self.buffer.borrow_mut();
        let buf = &mut *guard;
        let windows = self.windows(buf);
        f(RegionMut {
            entries: carve(buf.entries.view_mut(), &windows, &self.mapping),
            content: carve(buf.content.view_mut(), &windows, &self.mapping),
            squared_weights: carve(buf.squared_weights.view_mut(), &windows, &self.mapping),
        })
    }

    /// Owned copy of the visible region.
    pub fn to_arrays(&self) -> BinArrays<V> {
        self.read(|region| region.to_arrays())
    }

    // =========================================================================
    // Accumulation
    // =========================================================================

    /// Adds one entry of `weight` at the visible multi-index `index`.
    ///
    /// `scratch` is reused between calls to hold the physical index.
    pub fn accumulate(&self, index: &[usize], weight: V, scratch: &mut Vec<usize>) {
        let mut guard = self.buffer.borrow_mut();
        let buf = &mut *guard;

        scratch.clear();
        let mut visible = index.iter();
        for (d, m) in self.mapping.iter().enumerate() {
            let offset = buf.headroom[d].front();
            let slot = match *m {
                DimMap::Full => visible.next().copied().unwrap_or(0),
                DimMap::Range { start, .. } => start + visible.next().copied().unwrap_or(0),
                DimMap::Index(i) => i,
            };
            scratch.push(offset + slot);
        }

        let at = scratch.as_slice();
        buf.entries[at] += 1;
        buf.squared_weights[at] += weight.clone() * weight.clone();
        buf.content[at] += weight;
    }

    /// Zeroes the visible region.
    pub fn clear(&self) {
        self.write(|mut region| {
            region.entries.fill(0);
            region.content.fill(V::default());
            region.squared_weights.fill(V::default());
        });
    }

    /// Elementwise `+=` of another store with the same visible shape.
    pub fn add_from(&self, other: &BinStore<V>) -> Result<()> {
        let (mine, theirs) = (self.shape(), other.shape());
        if mine != theirs {
            return Err(HistError::ShapeMismatch {
                expected: mine,
                got: theirs,
            });
        }
        if Rc::ptr_eq(&self.buffer, &other.buffer) {
            let copy = other.to_arrays();
            self.write(|dst| {
                add_into(
                    dst,
                    &copy.entries.view(),
                    &copy.content.view(),
                    &copy.squared_weights.view(),
                )
            });
        } else {
            other.read(|src| {
                self.write(|dst| add_into(dst, &src.entries, &src.content, &src.squared_weights))
            });
        }
        Ok(())
    }

    /// Multiplies content by `factor` and squared weights by `factor²`.
    pub fn scale(&self, factor: &V) {
        let squared = factor.clone() * factor.clone();
        self.write(|mut region| {
            region
                .content
                .map_inplace(|x| *x = mem::take(x) * factor.clone());
            region
                .squared_weights
                .map_inplace(|x| *x = mem::take(x) * squared.clone());
        });
    }

    /// Divides content by `divisor` and squared weights by `divisor²`.
    pub fn divide(&self, divisor: &V)
    where
        V: Div<Output = V>,
    {
        let squared = divisor.clone() * divisor.clone();
        self.write(|mut region| {
            region
                .content
                .map_inplace(|x| *x = mem::take(x) / divisor.clone());
            region
                .squared_weights
                .map_inplace(|x| *x = mem::take(x) / squared.clone());
        });
    }

    // =========================================================================
    // Derived stores
    // =========================================================================

    /// Independent owning copy of the visible region.
    pub fn deepcopy(&self, capacity: &[(usize, usize)]) -> Self {
        Self::from_parts(self.to_arrays(), capacity)
    }

    /// View aliasing this store; one selection per visible dimension,
    /// missing trailing selections keep their dimension.
    pub(crate) fn view(&self, selections: &[DimSelect]) -> Self {
        let mut selections = selections.iter().copied();
        let mapping = self
            .mapping
            .iter()
            .map(|&m| {
                let base = match m {
                    DimMap::Index(_) => return m,
                    DimMap::Range { start, .. } => start,
                    DimMap::Full => 0,
                };
                match selections.next().unwrap_or(DimSelect::All) {
                    DimSelect::All => m,
                    DimSelect::Range { start, len } => DimMap::Range {
                        start: base + start,
                        len,
                    },
                    DimSelect::Index(i) => DimMap::Index(base + i),
                }
            })
            .collect();
        Self {
            buffer: Rc::clone(&self.buffer),
            mapping,
            is_view: true,
        }
    }

    /// Grows dimension `dim` by `extension`, keeping existing bins at their
    /// logical position relative to the old range. New slots are zero.
    pub fn grow(&mut self, dim: usize, extension: Extension) -> Result<()> {
        if !self.is_exclusive() {
            return Err(HistError::AliasedStorage);
        }
        let mut guard = self.buffer.borrow_mut();
        let buf = &mut *guard;
        let old_windows = buf.logical_windows();
        let old_shape = buf.shape.clone();

        let headroom = &mut buf.headroom[dim];
        let mut realloc = false;
        if extension.front > 0 {
            realloc |= headroom.claim_front(extension.front);
        }
        if extension.back > 0 {
            realloc |= headroom.claim_back(extension.back);
        }
        buf.shape[dim] += extension.front + extension.back;

        if realloc {
            let mut grown = BinBuffer::zeroed(buf.shape.clone(), buf.headroom.clone());
            let target: Vec<(usize, usize)> = grown
                .headroom
                .iter()
                .zip(&old_shape)
                .enumerate()
                .map(|(d, (h, &n))| {
                    let start = h.front() + if d == dim { extension.front } else { 0 };
                    (start, start + n)
                })
                .collect();
            let source = |ax: ndarray::AxisDescription| {
                let (s, e) = old_windows[ax.axis.index()];
                Slice::from(s..e)
            };
            let dest = |ax: ndarray::AxisDescription| {
                let (s, e) = target[ax.axis.index()];
                Slice::from(s..e)
            };
            grown
                .entries
                .slice_each_axis_mut(dest)
                .assign(&buf.entries.slice_each_axis(source));
            grown
                .content
                .slice_each_axis_mut(dest)
                .assign(&buf.content.slice_each_axis(source));
            grown
                .squared_weights
                .slice_each_axis_mut(dest)
                .assign(&buf.squared_weights.slice_each_axis(source));
            log::debug!(
                "bin store reallocated dimension {dim} to {} slots (shape {:?})",
                grown.entries.shape()[dim],
                grown.shape
            );
            *buf = grown;
        }
        Ok(())
    }
}

fn add_into<V: BinValue>(
    mut dst: RegionMut<'_, V>,
    entries: &ArrayViewD<'_, u64>,
    content: &ArrayViewD<'_, V>,
    squared_weights: &ArrayViewD<'_, V>,
) {
    Zip::from(&mut dst.entries)
        .and(entries)
        .for_each(|a, &b| *a += b);
    Zip::from(&mut dst.content)
        .and(content)
        .for_each(|a, b| *a += b.clone());
    Zip::from(&mut dst.squared_weights)
        .and(squared_weights)
        .for_each(|a, b| *a += b.clone());
}
