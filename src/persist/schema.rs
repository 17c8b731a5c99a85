//! Snapshot schema types.
//!
//! The snapshot format is independent of the runtime types so that it can
//! be validated on load and evolve through [`SNAPSHOT_VERSION`]. Bin arrays
//! are stored flattened in row-major order over all slots, boundary slots
//! included.

use serde::{Deserialize, Serialize};

use crate::value::ValueDtype;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Typed column of bin values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "snake_case")]
pub enum ValueColumn {
    F64(Vec<f64>),
    F32(Vec<f32>),
    I64(Vec<i64>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    U32(Vec<u32>),
}

impl ValueColumn {
    pub fn dtype(&self) -> ValueDtype {
        match self {
            Self::F64(_) => ValueDtype::F64,
            Self::F32(_) => ValueDtype::F32,
            Self::I64(_) => ValueDtype::I64,
            Self::I32(_) => ValueDtype::I32,
            Self::U64(_) => ValueDtype::U64,
            Self::U32(_) => ValueDtype::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::F64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single numeric edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarSchema {
    Int(i64),
    Float(f64),
}

/// Normal edges of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgesSchema {
    Float { values: Vec<f64> },
    Int { values: Vec<i64> },
}

impl EdgesSchema {
    pub fn len(&self) -> usize {
        match self {
            Self::Float { values } => values.len(),
            Self::Int { values } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Equidistant edge parameters of constant-width and log10 axes.
///
/// Edge `k` is `origin + (first + k) * width` in the equidistant space
/// (`log10` of the value for log10 axes). Keeping `origin` and `first`
/// apart reproduces the edges of extended or sliced axes bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformSchema {
    pub origin: f64,
    #[serde(default)]
    pub first: i64,
    pub width: f64,
    pub nbins: usize,
}

/// One axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSchema {
    /// Axis kind name, e.g. `constant_bin_width_axis`.
    pub class_name: String,
    pub edges: EdgesSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform: Option<UniformSchema>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: String,
    pub has_underflow_bin: bool,
    pub has_overflow_bin: bool,
    pub is_extendable: bool,
    #[serde(default)]
    pub extension_max_fcap: usize,
    #[serde(default)]
    pub extension_max_bcap: usize,
    /// Finite lower edge of the underflow bin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underflow_edge: Option<ScalarSchema>,
    /// Finite upper edge of the overflow bin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow_edge: Option<ScalarSchema>,
}

/// A whole histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    pub version: u32,
    pub ndim: usize,
    #[serde(default)]
    pub title: String,
    pub weight_dtype: ValueDtype,
    pub axes: Vec<AxisSchema>,
    /// Slot count per axis.
    pub shape: Vec<usize>,
    pub full_binentries: Vec<u64>,
    pub full_bincontent: ValueColumn,
    pub full_squaredweights: ValueColumn,
}
