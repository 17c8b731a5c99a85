//! Conversion between runtime histograms and snapshot schema types.
//!
//! Saving fails for value types without a storage column and for axes whose
//! edges are not numeric. Loading validates everything the constructors
//! would: edge order, kind names, boundary flags and array shapes.

use ndarray::{ArrayD, IxDyn};

use super::schema::{
    AxisSchema, EdgesSchema, HistogramSnapshot, ScalarSchema, UniformSchema, SNAPSHOT_VERSION,
};
use super::PersistError;
use crate::axis::{Axis, AxisKind, UniformParameters};
use crate::coord::Coord;
use crate::error::HistError;
use crate::histogram::{capacities, Histogram};
use crate::store::{BinArrays, BinStore};
use crate::value::BinValue;

// =============================================================================
// Scalars and edges
// =============================================================================

impl From<ScalarSchema> for Coord {
    fn from(scalar: ScalarSchema) -> Self {
        match scalar {
            ScalarSchema::Int(v) => Coord::Int(v),
            ScalarSchema::Float(v) => Coord::Float(v),
        }
    }
}

fn scalar_of(coord: &Coord, axis: usize) -> Result<ScalarSchema, HistError> {
    match coord {
        Coord::Int(v) => Ok(ScalarSchema::Int(*v)),
        Coord::Float(v) => Ok(ScalarSchema::Float(*v)),
        _ => Err(HistError::ObjectAxis { axis }),
    }
}

fn edges_of(axis: &Axis, index: usize) -> Result<EdgesSchema, HistError> {
    let edges = axis.edges();
    if edges.iter().all(|c| matches!(c, Coord::Int(_))) {
        let values = edges
            .iter()
            .filter_map(|c| match c {
                Coord::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Ok(EdgesSchema::Int { values });
    }
    edges
        .iter()
        .map(|c| match c {
            Coord::Int(_) | Coord::Float(_) => c.as_f64().ok_or(HistError::ObjectAxis { axis: index }),
            _ => Err(HistError::ObjectAxis { axis: index }),
        })
        .collect::<Result<Vec<f64>, _>>()
        .map(|values| EdgesSchema::Float { values })
}

fn coords_of(edges: EdgesSchema) -> Vec<Coord> {
    match edges {
        EdgesSchema::Float { values } => values.into_iter().map(Coord::Float).collect(),
        EdgesSchema::Int { values } => values.into_iter().map(Coord::Int).collect(),
    }
}

// =============================================================================
// Axis
// =============================================================================

/// Schema of axis number `index`.
pub(crate) fn axis_schema(axis: &Axis, index: usize) -> Result<AxisSchema, HistError> {
    let uniform = axis.uniform_parameters().map(|p| UniformSchema {
        origin: p.origin,
        first: p.first,
        width: p.width,
        nbins: p.nbins,
    });
    Ok(AxisSchema {
        class_name: axis.kind().name().to_string(),
        edges: edges_of(axis, index)?,
        uniform,
        label: axis.label().to_string(),
        name: axis.name().to_string(),
        has_underflow_bin: axis.has_underflow_bin(),
        has_overflow_bin: axis.has_overflow_bin(),
        is_extendable: axis.is_extendable(),
        extension_max_fcap: axis.max_front_capacity(),
        extension_max_bcap: axis.max_back_capacity(),
        underflow_edge: axis.underflow_edge().map(|c| scalar_of(c, index)).transpose()?,
        overflow_edge: axis.overflow_edge().map(|c| scalar_of(c, index)).transpose()?,
    })
}

impl TryFrom<AxisSchema> for Axis {
    type Error = PersistError;

    fn try_from(schema: AxisSchema) -> Result<Self, Self::Error> {
        let kind = AxisKind::from_name(&schema.class_name)?;
        let (uniform, generic_edges) = match kind {
            AxisKind::Generic => (None, Some(coords_of(schema.edges))),
            AxisKind::ConstantWidth | AxisKind::Log10 => {
                let Some(u) = schema.uniform else {
                    return Err(PersistError::Validation(format!(
                        "axis `{}` of kind {} has no uniform parameters",
                        schema.name, schema.class_name
                    )));
                };
                if schema.edges.len() != u.nbins + 1 {
                    return Err(PersistError::Validation(format!(
                        "axis `{}` stores {} edges for {} bins",
                        schema.name,
                        schema.edges.len(),
                        u.nbins
                    )));
                }
                let params = UniformParameters {
                    origin: u.origin,
                    first: u.first,
                    width: u.width,
                    nbins: u.nbins,
                };
                (Some(params), None)
            }
        };
        let axis = Axis::restore(
            kind,
            uniform,
            generic_edges,
            (
                schema.has_underflow_bin,
                schema.has_overflow_bin,
                schema.is_extendable,
            ),
            (schema.extension_max_fcap, schema.extension_max_bcap),
            (
                schema.underflow_edge.map(Coord::from),
                schema.overflow_edge.map(Coord::from),
            ),
            schema.label,
            schema.name,
        )?;
        Ok(axis)
    }
}

// =============================================================================
// Histogram
// =============================================================================

fn column_of<V: BinValue>(array: ArrayD<V>) -> Result<super::schema::ValueColumn, HistError> {
    V::to_column(array.iter().cloned().collect()).ok_or(HistError::ObjectWeights)
}

fn array_of<T>(shape: &[usize], values: Vec<T>) -> Result<ArrayD<T>, HistError> {
    let got = values.len();
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| HistError::ShapeMismatch {
        expected: shape.to_vec(),
        got: vec![got],
    })
}

impl<V: BinValue> Histogram<V> {
    /// Snapshot of axes, metadata and all slots.
    ///
    /// # Errors
    ///
    /// - [`HistError::ObjectWeights`] if `V` has no storage column
    /// - [`HistError::ObjectAxis`] if an axis has non-numeric edges
    pub fn to_snapshot(&self) -> Result<HistogramSnapshot, PersistError> {
        if !V::DTYPE.is_pod() {
            return Err(HistError::ObjectWeights.into());
        }
        let axes = self
            .axes
            .iter()
            .enumerate()
            .map(|(i, axis)| axis_schema(axis, i))
            .collect::<Result<Vec<_>, _>>()?;
        let BinArrays {
            entries,
            content,
            squared_weights,
        } = self.store.to_arrays();
        let snapshot = HistogramSnapshot {
            version: SNAPSHOT_VERSION,
            ndim: self.ndim(),
            title: self.title.clone(),
            weight_dtype: V::DTYPE,
            axes,
            shape: entries.shape().to_vec(),
            full_binentries: entries.iter().copied().collect(),
            full_bincontent: column_of(content)?,
            full_squaredweights: column_of(squared_weights)?,
        };
        log::debug!(
            "saved snapshot of a {}-dimensional histogram with shape {:?}",
            snapshot.ndim,
            snapshot.shape
        );
        Ok(snapshot)
    }

    /// Rebuilds an owning histogram from a snapshot.
    pub fn from_snapshot(snapshot: HistogramSnapshot) -> Result<Self, PersistError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistError::Validation(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if snapshot.weight_dtype != V::DTYPE {
            return Err(HistError::DtypeMismatch {
                expected: V::DTYPE,
                stored: snapshot.weight_dtype,
            }
            .into());
        }
        if snapshot.axes.len() != snapshot.ndim {
            return Err(HistError::DimensionMismatch {
                expected: snapshot.ndim,
                got: snapshot.axes.len(),
            }
            .into());
        }
        let axes = snapshot
            .axes
            .into_iter()
            .map(Axis::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let shape: Vec<usize> = axes.iter().map(Axis::total_slots).collect();
        if shape != snapshot.shape {
            return Err(HistError::ShapeMismatch {
                expected: shape,
                got: snapshot.shape,
            }
            .into());
        }

        let stored = snapshot.full_bincontent.dtype();
        let values = |column| {
            V::from_column(column).ok_or(HistError::DtypeMismatch {
                expected: V::DTYPE,
                stored,
            })
        };
        let arrays = BinArrays {
            entries: array_of(&shape, snapshot.full_binentries)?,
            content: array_of(&shape, values(snapshot.full_bincontent)?)?,
            squared_weights: array_of(&shape, values(snapshot.full_squaredweights)?)?,
        };
        let store = BinStore::from_arrays(arrays, &capacities(&axes))?;
        let mut hist = Histogram::new(axes)?;
        hist.store = store;
        hist.title = snapshot.title;
        log::debug!("loaded snapshot with shape {:?}", shape);
        Ok(hist)
    }
}
