//! ndhist: N-dimensional histograms for Rust.
//!
//! Histograms over any number of axes, with optional underflow and overflow
//! bins, axes that extend on demand, views that alias their source's bins,
//! and structural operations such as projection and bin merging.
//!
//! # Key Types
//!
//! - [`Histogram`] - Axes plus a bin store of entries, content and squared weights
//! - [`Axis`] / [`AxisOptions`] - One dimension and its construction options
//! - [`BinStore`] - Dense bin arrays, owned or aliasing
//! - [`Coord`] / [`CoordColumn`] / [`Weights`] - Fill inputs
//! - [`BinValue`] - Capability trait for accumulated values
//! - [`HistError`] - Error type of all fallible operations
//!
//! # Filling
//!
//! ```
//! use ndhist::axis::{linear, AxisOptions};
//! use ndhist::{CoordColumn, Histogram, Weights};
//!
//! let opts = AxisOptions::builder().label("x").build().unwrap();
//! let mut h = Histogram::<f64>::new(vec![linear(0.0, 10.0, 1.0, &opts).unwrap()]).unwrap();
//!
//! let xs = [0.5, 3.2, 3.7, 12.0];
//! let stats = h.fill(&[CoordColumn::from(&xs)], Weights::Scalar(2.0)).unwrap();
//! assert_eq!(stats.filled, 4);
//! assert_eq!(h.bincontent()[[3]], 4.0);
//! assert_eq!(h.overflow()[0].sum(), 2.0);
//! ```
//!
//! # Adding
//!
//! `+` and `+=` panic when the axes differ. Prefer the fallible forms when
//! the operands come from different sources:
//!
//! ```
//! use ndhist::axis::{linear, AxisOptions};
//! use ndhist::{HistError, Histogram};
//!
//! let opts = AxisOptions::default();
//! let mut a = Histogram::<f64>::new(vec![linear(0.0, 10.0, 1.0, &opts).unwrap()]).unwrap();
//! let b = Histogram::<f64>::new(vec![linear(0.0, 5.0, 1.0, &opts).unwrap()]).unwrap();
//!
//! let err = a.try_add_assign(&b).unwrap_err();
//! assert!(matches!(err, HistError::IncompatibleAxes { axis: 0, .. }));
//! ```
//!
//! See the [`axis`] module for axis kinds, [`view`] for slicing and
//! [`ops`] for projection and merging.

// Re-export approx for users comparing bin arrays
pub use approx;

pub mod axis;
pub mod coord;
pub mod error;
pub mod fill;
pub mod headroom;
pub mod histogram;
pub mod ops;
pub mod persist;
pub mod store;
pub mod testing;
pub mod value;
pub mod view;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use axis::{Axis, AxisKind, AxisOptions, BinLookup, Extension, MAX_EXTENDED_BINS};
pub use coord::{Coord, CoordColumn, OrderedKey, Weights};
pub use error::{ErrorKind, HistError, Result};
pub use fill::{FillStats, MAX_TUPLE_FILL_NDIM};
pub use histogram::Histogram;
pub use persist::{HistogramSnapshot, PersistError};
pub use store::{BinArrays, BinStore};
pub use value::{BinValue, ValueDtype};
pub use view::Selector;
