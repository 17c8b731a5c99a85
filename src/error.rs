//! Error types for histogram construction, filling and persistence.
//!
//! Every fallible operation in the crate returns [`HistError`]. Variants are
//! grouped into four families, see [`ErrorKind`]:
//!
//! - **Configuration**: malformed axes, mismatched axes, bad selectors or
//!   group sizes, dimensionality mismatches.
//! - **Shape**: weight or coordinate arrays of the wrong length.
//! - **TypeCompatibility**: persisting object-typed axes or bin values.
//! - **Entry**: a single entry of a fill batch could not be classified or
//!   would grow an axis without bound.
//!
//! Entries that fall outside a non-extendable axis without a matching
//! boundary bin are silently discarded and never produce an error.

use crate::value::ValueDtype;

/// Family a [`HistError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Shape,
    TypeCompatibility,
    Entry,
}

/// Errors reported by histogram operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistError {
    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("axis needs at least two edges, got {got}")]
    TooFewEdges { got: usize },

    #[error("axis edges must be strictly increasing (violated at edge {index})")]
    EdgesNotIncreasing { index: usize },

    #[error("axis edge {index} is not finite")]
    NonFiniteEdge { index: usize },

    #[error("bin width must be positive and finite, got {width}")]
    InvalidWidth { width: f64 },

    #[error("log10 axis range must be positive, got start {start}")]
    NonPositiveLogRange { start: f64 },

    #[error("an extendable axis cannot have underflow or overflow bins")]
    ExtendableWithBoundaryBins,

    #[error("{kind} axes cannot be extended")]
    NotExtendable { kind: &'static str },

    #[error("axis {axis} is not compatible: {reason}")]
    IncompatibleAxes { axis: usize, reason: &'static str },

    #[error("expected {expected} dimensions, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("columnar fill supports at most {max} dimensions, got {got}; fill by axis name instead")]
    TupleFillLimit { max: usize, got: usize },

    #[error("no column named `{name}` in the record batch")]
    MissingColumn { name: String },

    #[error("axis name `{name}` is used more than once")]
    DuplicateAxisName { name: String },

    #[error("axis index {axis} out of range for a {ndim}-dimensional histogram")]
    AxisOutOfRange { axis: usize, ndim: usize },

    #[error("axis {axis} is listed more than once")]
    DuplicateAxis { axis: usize },

    #[error("invalid selector: {reason}")]
    InvalidSelector { reason: String },

    #[error("group size must be at least 1")]
    InvalidGroupSize,

    #[error("bin storage is shared with a view; the operation needs exclusive ownership")]
    AliasedStorage,

    #[error("unknown axis kind `{0}`")]
    UnknownAxisKind(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    // =========================================================================
    // Shape
    // =========================================================================
    #[error("weight array has length {got}, expected 1 or {expected}")]
    WeightLength { expected: usize, got: usize },

    #[error("coordinate column for axis {axis} has length {got}, expected {expected}")]
    ColumnLength {
        axis: usize,
        expected: usize,
        got: usize,
    },

    #[error("shape {got:?} does not match {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    // =========================================================================
    // Type compatibility
    // =========================================================================
    #[error("axis {axis} has object-typed edges and cannot be persisted")]
    ObjectAxis { axis: usize },

    #[error("object-typed bin values cannot be persisted")]
    ObjectWeights,

    #[error("stored weight dtype {stored:?} does not match {expected:?}")]
    DtypeMismatch {
        expected: ValueDtype,
        stored: ValueDtype,
    },

    // =========================================================================
    // Entry
    // =========================================================================
    #[error("entry {entry}: coordinate on axis {axis} cannot be ordered against the axis edges")]
    Unordered { entry: usize, axis: usize },

    #[error("coordinate cannot be ordered against the axis edges")]
    UnorderedValue,

    #[error("covering the coordinate would grow axis {axis} past {max} bins")]
    ExtensionTooLarge { axis: usize, max: usize },
}

impl HistError {
    /// The error family of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WeightLength { .. } | Self::ColumnLength { .. } | Self::ShapeMismatch { .. } => {
                ErrorKind::Shape
            }
            Self::ObjectAxis { .. } | Self::ObjectWeights | Self::DtypeMismatch { .. } => {
                ErrorKind::TypeCompatibility
            }
            Self::Unordered { .. } | Self::UnorderedValue | Self::ExtensionTooLarge { .. } => {
                ErrorKind::Entry
            }
            _ => ErrorKind::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, HistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_families() {
        assert_eq!(HistError::ExtendableWithBoundaryBins.kind(), ErrorKind::Configuration);
        assert_eq!(
            HistError::WeightLength { expected: 3, got: 2 }.kind(),
            ErrorKind::Shape
        );
        assert_eq!(HistError::ObjectWeights.kind(), ErrorKind::TypeCompatibility);
        assert_eq!(HistError::Unordered { entry: 4, axis: 0 }.kind(), ErrorKind::Entry);
    }

    #[test]
    fn messages_name_the_offender() {
        let msg = HistError::ColumnLength { axis: 1, expected: 3, got: 2 }.to_string();
        assert!(msg.contains("axis 1"));
        assert!(msg.contains("length 2"));
    }
}
