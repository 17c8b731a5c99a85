//! The user-facing n-dimensional histogram.
//!
//! A [`Histogram`] pairs one [`Axis`] per dimension with a [`BinStore`]
//! whose shape is the product of the axes' slot counts. Filling lives in
//! [`fill`](crate::fill), slicing and copying in [`view`](crate::view), and
//! projection and rebinning in [`ops`](crate::ops).
//!
//! # Example
//!
//! ```
//! use ndhist::axis::{linear, AxisOptions};
//! use ndhist::{CoordColumn, Histogram, Weights};
//!
//! let axis = linear(0.0, 10.0, 1.0, &AxisOptions::default()).unwrap();
//! let mut h = Histogram::<f64>::new(vec![axis]).unwrap();
//! let xs = [0.5, 1.5, 1.7, 12.0];
//! h.fill(&[CoordColumn::from(&xs)], Weights::Scalar(2.0)).unwrap();
//!
//! assert_eq!(h.bincontent()[[1]], 4.0);
//! assert_eq!(h.overflow()[0][[0]], 2.0);
//! ```

use std::collections::HashSet;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

use ndarray::{Array1, ArrayD, ArrayViewD, Axis as NdAxis, IxDyn, Slice};
use num_traits::Float;

use crate::axis::Axis;
use crate::error::{HistError, Result};
use crate::store::BinStore;
use crate::value::{BinValue, ValueDtype};

/// N-dimensional histogram over bin values of type `V`.
#[derive(Debug)]
pub struct Histogram<V = f64> {
    pub(crate) axes: Vec<Axis>,
    pub(crate) store: BinStore<V>,
    pub(crate) title: String,
}

/// Reserve per dimension for a store over `axes`.
pub(crate) fn capacities(axes: &[Axis]) -> Vec<(usize, usize)> {
    axes.iter()
        .map(|a| (a.max_front_capacity(), a.max_back_capacity()))
        .collect()
}

impl<V: BinValue> Histogram<V> {
    /// Creates an empty histogram. Unnamed axes are named `a0`, `a1`, ...
    ///
    /// # Errors
    ///
    /// [`HistError::DuplicateAxisName`] if two axes share a name.
    pub fn new(mut axes: Vec<Axis>) -> Result<Self> {
        for (i, axis) in axes.iter_mut().enumerate() {
            if axis.name().is_empty() {
                axis.set_name(format!("a{i}"));
            }
        }
        let mut seen = HashSet::new();
        for axis in &axes {
            if !seen.insert(axis.name()) {
                return Err(HistError::DuplicateAxisName {
                    name: axis.name().to_string(),
                });
            }
        }
        let shape: Vec<usize> = axes.iter().map(Axis::total_slots).collect();
        let store = BinStore::allocate(&shape, &capacities(&axes));
        Ok(Self {
            axes,
            store,
            title: String::new(),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub(crate) fn from_parts(axes: Vec<Axis>, store: BinStore<V>, title: String) -> Self {
        Self { axes, store, title }
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Slot counts per axis, including boundary bins.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::total_slots).collect()
    }

    /// Normal bin counts per axis.
    pub fn nbins(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::nbins).collect()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn labels(&self) -> Vec<&str> {
        self.axes.iter().map(Axis::label).collect()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Storage tag of the bin values.
    pub fn weight_dtype(&self) -> ValueDtype {
        V::DTYPE
    }

    /// Whether the bins alias another histogram's storage.
    pub fn is_view(&self) -> bool {
        self.store.is_view()
    }

    pub fn store(&self) -> &BinStore<V> {
        &self.store
    }

    /// Slot boundaries of every axis, see [`Axis::binedges`].
    pub fn binedges(&self) -> Vec<Array1<f64>> {
        self.axes.iter().map(Axis::binedges).collect()
    }

    pub fn bincenters(&self) -> Vec<Array1<f64>> {
        self.axes.iter().map(Axis::bincenters).collect()
    }

    pub fn binwidths(&self) -> Vec<Array1<f64>> {
        self.axes.iter().map(Axis::binwidths).collect()
    }

    // =========================================================================
    // Bin arrays
    // =========================================================================

    fn normal<'a, T>(&self, mut view: ArrayViewD<'a, T>) -> ArrayViewD<'a, T> {
        view.slice_each_axis_inplace(|ax| {
            let axis = &self.axes[ax.axis.index()];
            let start = axis.has_underflow_bin() as usize;
            Slice::from(start..start + axis.nbins())
        });
        view
    }

    /// Entry counts of the normal bins.
    pub fn binentries(&self) -> ArrayD<u64> {
        self.store.read(|r| self.normal(r.entries).to_owned())
    }

    /// Summed weights of the normal bins.
    pub fn bincontent(&self) -> ArrayD<V> {
        self.store.read(|r| self.normal(r.content).to_owned())
    }

    /// Summed squared weights of the normal bins.
    pub fn squaredweights(&self) -> ArrayD<V> {
        self.store.read(|r| self.normal(r.squared_weights).to_owned())
    }

    /// Entry counts of all slots, boundary bins included.
    pub fn full_binentries(&self) -> ArrayD<u64> {
        self.store.read(|r| r.entries.to_owned())
    }

    pub fn full_bincontent(&self) -> ArrayD<V> {
        self.store.read(|r| r.content.to_owned())
    }

    pub fn full_squaredweights(&self) -> ArrayD<V> {
        self.store.read(|r| r.squared_weights.to_owned())
    }

    /// Per axis, the underflow hyperslab of the content: the full array with
    /// that axis reduced to its underflow slot (zeros if the axis has none).
    pub fn underflow(&self) -> Vec<ArrayD<V>> {
        self.store
            .read(|r| boundary_slabs(&r.content, &self.axes, V::default(), Boundary::Under))
    }

    pub fn underflow_entries(&self) -> Vec<ArrayD<u64>> {
        self.store
            .read(|r| boundary_slabs(&r.entries, &self.axes, 0, Boundary::Under))
    }

    pub fn underflow_squaredweights(&self) -> Vec<ArrayD<V>> {
        self.store.read(|r| {
            boundary_slabs(&r.squared_weights, &self.axes, V::default(), Boundary::Under)
        })
    }

    /// Per axis, the overflow hyperslab of the content.
    pub fn overflow(&self) -> Vec<ArrayD<V>> {
        self.store
            .read(|r| boundary_slabs(&r.content, &self.axes, V::default(), Boundary::Over))
    }

    pub fn overflow_entries(&self) -> Vec<ArrayD<u64>> {
        self.store
            .read(|r| boundary_slabs(&r.entries, &self.axes, 0, Boundary::Over))
    }

    pub fn overflow_squaredweights(&self) -> Vec<ArrayD<V>> {
        self.store.read(|r| {
            boundary_slabs(&r.squared_weights, &self.axes, V::default(), Boundary::Over)
        })
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Zeroes all visible bins.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Owning histogram with cloned axes and zeroed bins.
    pub fn empty_like(&self) -> Self {
        let store = BinStore::allocate(&self.shape(), &capacities(&self.axes));
        Self::from_parts(self.axes.clone(), store, self.title.clone())
    }

    /// Whether `other` has the same number of axes with identical edges and
    /// boundary bins.
    pub fn is_compatible(&self, other: &Histogram<V>) -> bool {
        self.check_compatible(other).is_ok()
    }

    fn check_compatible(&self, other: &Histogram<V>) -> Result<()> {
        if self.ndim() != other.ndim() {
            return Err(HistError::DimensionMismatch {
                expected: self.ndim(),
                got: other.ndim(),
            });
        }
        for (i, (a, b)) in self.axes.iter().zip(&other.axes).enumerate() {
            if !a.is_compatible(b) {
                return Err(HistError::IncompatibleAxes {
                    axis: i,
                    reason: "edges or boundary bins differ",
                });
            }
        }
        Ok(())
    }

    /// `self += other`, elementwise on entries, content and squared weights.
    pub fn try_add_assign(&mut self, other: &Histogram<V>) -> Result<()> {
        self.check_compatible(other)?;
        self.store.add_from(&other.store)
    }

    /// `self + other` as a new owning histogram.
    pub fn try_add(&self, other: &Histogram<V>) -> Result<Histogram<V>> {
        self.check_compatible(other)?;
        let sum = self.deepcopy();
        sum.store.add_from(&other.store)?;
        Ok(sum)
    }

    /// Multiplies content by `factor` and squared weights by `factor²`.
    /// Entry counts are unchanged.
    pub fn scale(&mut self, factor: V) {
        self.store.scale(&factor);
    }
}

impl<V: BinValue + Float> Histogram<V> {
    /// Square root of the squared weights of the normal bins.
    pub fn binerror(&self) -> ArrayD<V> {
        self.squaredweights().mapv(|x| x.sqrt())
    }
}

// =============================================================================
// Boundary hyperslabs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Under,
    Over,
}

fn boundary_slabs<T: Clone>(
    view: &ArrayViewD<'_, T>,
    axes: &[Axis],
    zero: T,
    which: Boundary,
) -> Vec<ArrayD<T>> {
    axes.iter()
        .enumerate()
        .map(|(d, axis)| {
            let slot = match which {
                Boundary::Under if axis.has_underflow_bin() => Some(0),
                Boundary::Over if axis.has_overflow_bin() => Some(axis.total_slots() - 1),
                _ => None,
            };
            match slot {
                Some(s) => view.slice_axis(NdAxis(d), Slice::from(s..s + 1)).to_owned(),
                None => {
                    let mut shape = view.shape().to_vec();
                    shape[d] = 1;
                    ArrayD::from_elem(IxDyn(&shape), zero.clone())
                }
            }
        })
        .collect()
}

// =============================================================================
// Operators
// =============================================================================

/// # Panics
///
/// Panics if the histograms are not compatible, see
/// [`Histogram::try_add_assign`] for the fallible form.
impl<V: BinValue> AddAssign<&Histogram<V>> for Histogram<V> {
    fn add_assign(&mut self, other: &Histogram<V>) {
        if let Err(err) = self.try_add_assign(other) {
            panic!("cannot add histograms: {err}");
        }
    }
}

/// # Panics
///
/// Panics if the histograms are not compatible, see [`Histogram::try_add`].
impl<V: BinValue> Add<&Histogram<V>> for &Histogram<V> {
    type Output = Histogram<V>;

    fn add(self, other: &Histogram<V>) -> Histogram<V> {
        match self.try_add(other) {
            Ok(sum) => sum,
            Err(err) => panic!("cannot add histograms: {err}"),
        }
    }
}

impl<V: BinValue> MulAssign<V> for Histogram<V> {
    fn mul_assign(&mut self, factor: V) {
        self.scale(factor);
    }
}

impl<V: BinValue + Div<Output = V>> DivAssign<V> for Histogram<V> {
    fn div_assign(&mut self, divisor: V) {
        self.store.divide(&divisor);
    }
}

impl<V: BinValue> Mul<V> for &Histogram<V> {
    type Output = Histogram<V>;

    fn mul(self, factor: V) -> Histogram<V> {
        let mut scaled = self.deepcopy();
        scaled *= factor;
        scaled
    }
}

impl<V: BinValue + Div<Output = V>> Div<V> for &Histogram<V> {
    type Output = Histogram<V>;

    fn div(self, divisor: V) -> Histogram<V> {
        let mut scaled = self.deepcopy();
        scaled /= divisor;
        scaled
    }
}
