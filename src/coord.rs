//! Coordinates fed into histogram fills and used as generic axis edges.
//!
//! Numeric axes accept [`Coord::Float`] and [`Coord::Int`]. Generic axes
//! order their edges with [`Coord::try_lt`], which only relies on a strict
//! "less than" relation and never on arithmetic. Comparisons that have no
//! answer (NaN, or values of unrelated types) yield `None`.
//!
//! # Key Types
//!
//! - [`Coord`] - A single coordinate value
//! - [`OrderedKey`] - Order capability for user-defined coordinate objects
//! - [`CoordColumn`] - Borrowed column of coordinates for one axis
//! - [`Weights`] - Scalar or per-entry weights of a fill batch

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::value::BinValue;

// =============================================================================
// OrderedKey
// =============================================================================

/// Strict ordering for user-defined coordinate types.
///
/// Implemented for every `PartialOrd + Debug + 'static` type; two keys of
/// different concrete types are unordered.
pub trait OrderedKey: fmt::Debug {
    /// `Some(self < other)`, or `None` if the two keys cannot be ordered.
    fn key_lt(&self, other: &dyn OrderedKey) -> Option<bool>;

    fn as_any(&self) -> &dyn Any;
}

impl<T: PartialOrd + fmt::Debug + 'static> OrderedKey for T {
    fn key_lt(&self, other: &dyn OrderedKey) -> Option<bool> {
        let other = other.as_any().downcast_ref::<T>()?;
        self.partial_cmp(other).map(Ordering::is_lt)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Coord
// =============================================================================

/// A coordinate value.
#[derive(Debug, Clone)]
pub enum Coord {
    Float(f64),
    Int(i64),
    Text(Rc<str>),
    /// Opaque user object; only orderable against keys of the same type.
    Key(Rc<dyn OrderedKey>),
}

impl Coord {
    /// Wraps an arbitrary ordered value.
    pub fn key<T: PartialOrd + fmt::Debug + 'static>(value: T) -> Self {
        Coord::Key(Rc::new(value))
    }

    /// Numeric value, if this coordinate has one.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Coord::Float(v) => Some(v),
            Coord::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    /// Strict `<`, or `None` if the values cannot be ordered.
    pub fn try_lt(&self, other: &Coord) -> Option<bool> {
        match (self, other) {
            (Coord::Int(a), Coord::Int(b)) => Some(a < b),
            (Coord::Text(a), Coord::Text(b)) => Some(a < b),
            (Coord::Key(a), Coord::Key(b)) => a.key_lt(b.as_ref()),
            (a, b) => {
                let (a, b) = (a.as_f64()?, b.as_f64()?);
                a.partial_cmp(&b).map(Ordering::is_lt)
            }
        }
    }

    /// Whether the coordinate is an opaque user object.
    pub fn is_object(&self) -> bool {
        matches!(self, Coord::Key(_))
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coord::Key(a), Coord::Key(b)) => Rc::ptr_eq(a, b),
            _ => self.try_lt(other) == Some(false) && other.try_lt(self) == Some(false),
        }
    }
}

impl From<f64> for Coord {
    fn from(v: f64) -> Self {
        Coord::Float(v)
    }
}

impl From<f32> for Coord {
    fn from(v: f32) -> Self {
        Coord::Float(v as f64)
    }
}

impl From<i64> for Coord {
    fn from(v: i64) -> Self {
        Coord::Int(v)
    }
}

impl From<i32> for Coord {
    fn from(v: i32) -> Self {
        Coord::Int(v as i64)
    }
}

impl From<&str> for Coord {
    fn from(v: &str) -> Self {
        Coord::Text(Rc::from(v))
    }
}

impl From<String> for Coord {
    fn from(v: String) -> Self {
        Coord::Text(Rc::from(v))
    }
}

// =============================================================================
// CoordColumn
// =============================================================================

/// Coordinates of a fill batch along one axis.
#[derive(Debug, Clone, Copy)]
pub enum CoordColumn<'a> {
    Float(&'a [f64]),
    Int(&'a [i64]),
    Coords(&'a [Coord]),
}

impl<'a> CoordColumn<'a> {
    pub fn len(&self) -> usize {
        match self {
            CoordColumn::Float(v) => v.len(),
            CoordColumn::Int(v) => v.len(),
            CoordColumn::Coords(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinate of entry `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Coord {
        match self {
            CoordColumn::Float(v) => Coord::Float(v[i]),
            CoordColumn::Int(v) => Coord::Int(v[i]),
            CoordColumn::Coords(v) => v[i].clone(),
        }
    }
}

impl<'a> From<&'a [f64]> for CoordColumn<'a> {
    fn from(v: &'a [f64]) -> Self {
        CoordColumn::Float(v)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for CoordColumn<'a> {
    fn from(v: &'a [f64; N]) -> Self {
        CoordColumn::Float(v)
    }
}

impl<'a> From<&'a Vec<f64>> for CoordColumn<'a> {
    fn from(v: &'a Vec<f64>) -> Self {
        CoordColumn::Float(v)
    }
}

impl<'a> From<&'a [i64]> for CoordColumn<'a> {
    fn from(v: &'a [i64]) -> Self {
        CoordColumn::Int(v)
    }
}

impl<'a, const N: usize> From<&'a [i64; N]> for CoordColumn<'a> {
    fn from(v: &'a [i64; N]) -> Self {
        CoordColumn::Int(v)
    }
}

impl<'a> From<&'a [Coord]> for CoordColumn<'a> {
    fn from(v: &'a [Coord]) -> Self {
        CoordColumn::Coords(v)
    }
}

impl<'a, const N: usize> From<&'a [Coord; N]> for CoordColumn<'a> {
    fn from(v: &'a [Coord; N]) -> Self {
        CoordColumn::Coords(v)
    }
}

impl<'a> From<&'a Vec<Coord>> for CoordColumn<'a> {
    fn from(v: &'a Vec<Coord>) -> Self {
        CoordColumn::Coords(v)
    }
}

// =============================================================================
// Weights
// =============================================================================

/// Weights of a fill batch.
///
/// A per-entry slice of length 1 broadcasts like a scalar.
#[derive(Debug, Clone)]
pub enum Weights<'a, V> {
    Scalar(V),
    PerEntry(&'a [V]),
}

impl<'a, V: Clone> Weights<'a, V> {
    /// Number of entries the weights describe, `None` for broadcasting weights.
    pub fn batch_len(&self) -> Option<usize> {
        match self {
            Weights::PerEntry(w) if w.len() != 1 => Some(w.len()),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn at(&self, i: usize) -> V {
        match self {
            Weights::Scalar(w) => w.clone(),
            Weights::PerEntry(w) if w.len() == 1 => w[0].clone(),
            Weights::PerEntry(w) => w[i].clone(),
        }
    }
}

/// Unit weight for every entry.
impl<'a, V: BinValue> Default for Weights<'a, V> {
    fn default() -> Self {
        Weights::Scalar(V::one())
    }
}

impl<'a, V> From<&'a [V]> for Weights<'a, V> {
    fn from(w: &'a [V]) -> Self {
        Weights::PerEntry(w)
    }
}

impl<'a, V> From<&'a Vec<V>> for Weights<'a, V> {
    fn from(w: &'a Vec<V>) -> Self {
        Weights::PerEntry(w)
    }
}

impl<'a, V, const N: usize> From<&'a [V; N]> for Weights<'a, V> {
    fn from(w: &'a [V; N]) -> Self {
        Weights::PerEntry(w)
    }
}
