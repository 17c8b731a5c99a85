//! Bin value types.
//!
//! A histogram is generic over the type `V` accumulated in its `content` and
//! `squaredweights` arrays. Plain numeric types implement [`BinValue`] out of
//! the box; user-defined value objects implement it explicitly and only need
//! in-place addition, multiplication and a neutral "one" weight.
//!
//! # Key Types
//!
//! - [`BinValue`] - Capability trait for accumulated values
//! - [`ValueDtype`] - Storage tag used by persistence

use std::fmt;
use std::ops::{AddAssign, Mul};

use serde::{Deserialize, Serialize};

use crate::persist::schema::ValueColumn;

/// Storage type tag of a bin value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDtype {
    F64,
    F32,
    I64,
    I32,
    U64,
    U32,
    /// User-defined value type without a plain storage representation.
    Object,
}

impl ValueDtype {
    /// Whether values of this type can be persisted.
    pub fn is_pod(self) -> bool {
        !matches!(self, Self::Object)
    }
}

/// A value that can be accumulated in histogram bins.
///
/// `Default` is the zero of the type: freshly allocated and cleared bins hold
/// `V::default()`. Filling adds the weight to `content` and `weight * weight`
/// to `squaredweights`.
///
/// Object types keep the default [`DTYPE`](Self::DTYPE) and column hooks and
/// therefore cannot be persisted.
pub trait BinValue: Clone + Default + fmt::Debug + AddAssign + Mul<Output = Self> + 'static {
    /// Storage tag.
    const DTYPE: ValueDtype = ValueDtype::Object;

    /// The implicit weight of an entry filled without an explicit weight.
    fn one() -> Self;

    /// Packs values into a typed persistence column.
    fn to_column(values: Vec<Self>) -> Option<ValueColumn> {
        let _ = values;
        None
    }

    /// Unpacks a typed persistence column.
    fn from_column(column: ValueColumn) -> Option<Vec<Self>> {
        let _ = column;
        None
    }
}

macro_rules! impl_pod_value {
    ($ty:ty, $variant:ident, $one:expr) => {
        impl BinValue for $ty {
            const DTYPE: ValueDtype = ValueDtype::$variant;

            #[inline]
            fn one() -> Self {
                $one
            }

            fn to_column(values: Vec<Self>) -> Option<ValueColumn> {
                Some(ValueColumn::$variant(values))
            }

            fn from_column(column: ValueColumn) -> Option<Vec<Self>> {
                match column {
                    ValueColumn::$variant(values) => Some(values),
                    _ => None,
                }
            }
        }
    };
}

impl_pod_value!(f64, F64, 1.0);
impl_pod_value!(f32, F32, 1.0);
impl_pod_value!(i64, I64, 1);
impl_pod_value!(i32, I32, 1);
impl_pod_value!(u64, U64, 1);
impl_pod_value!(u32, U32, 1);
