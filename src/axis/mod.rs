//! Histogram axes.
//!
//! An [`Axis`] describes one dimension: its normal bin edges, optional
//! underflow and overflow bins, and whether it extends when values fall
//! outside its range. Three kinds of edges exist, see [`AxisKind`]:
//!
//! - **Constant width**: equidistant edges, O(1) lookup.
//! - **Log10**: edges equidistant in `log10` space, O(1) lookup.
//! - **Generic**: arbitrary strictly increasing [`Coord`] values, binary
//!   search using only `<`. Never extendable.
//!
//! Normal bins are half-open, `[lower, upper)`, including the last one: a
//! value equal to the last edge belongs to the overflow bin.
//!
//! # Key Types
//!
//! - [`Axis`] - One histogram dimension
//! - [`AxisOptions`] - Label, name and range policy for construction
//! - [`BinLookup`] - Result of classifying one value
//!
//! # Slots
//!
//! An axis has `total_slots() = nbins() + has_underflow + has_overflow`
//! slots. Slot 0 is the underflow bin if present, the last slot is the
//! overflow bin if present.

mod builders;
mod generic;
mod options;
mod uniform;

pub use builders::{generic, linear, linear_bins, log10};
pub use options::AxisOptions;

use ndarray::Array1;

use crate::coord::Coord;
use crate::error::{HistError, Result};
use crate::headroom::Headroom;

use generic::GenericEdges;
use uniform::{Transform, UniformEdges};

// =============================================================================
// AxisKind
// =============================================================================

/// Closed set of axis kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    ConstantWidth,
    Log10,
    Generic,
}

/// Stored kind names, used by persistence.
const AXIS_KIND_NAMES: [(&str, AxisKind); 3] = [
    ("constant_bin_width_axis", AxisKind::ConstantWidth),
    ("log10_axis", AxisKind::Log10),
    ("generic_axis", AxisKind::Generic),
];

impl AxisKind {
    pub fn name(self) -> &'static str {
        AXIS_KIND_NAMES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("generic_axis", |(name, _)| name)
    }

    /// Looks up a stored kind name.
    pub fn from_name(name: &str) -> Result<Self> {
        AXIS_KIND_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| HistError::UnknownAxisKind(name.to_string()))
    }
}

// =============================================================================
// Lookup results
// =============================================================================

/// Largest number of normal bins an axis may reach by extension.
pub const MAX_EXTENDED_BINS: usize = 1 << 24;

/// Bins an edge set must add to cover a value outside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
    Bins(usize),
    /// More than [`MAX_EXTENDED_BINS`] in total.
    TooFar,
    /// No finite number of bins covers the value.
    Never,
}

/// Position of a value relative to the normal range of one edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Locate {
    /// Below the first edge.
    Below(Reach),
    Inside(usize),
    /// At or above the last edge.
    Above(Reach),
}

/// Classification of one value on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinLookup {
    /// Normal bin index, not counting the underflow slot.
    Normal(usize),
    Underflow,
    Overflow,
    /// The axis must grow by this many bins in front.
    ExtendBefore(usize),
    /// The axis must grow by this many bins at the back.
    ExtendAfter(usize),
    /// Beyond the outer edge of a boundary bin, or not reachable by extension.
    OutOfRange,
    /// Covering the value would grow the axis past [`MAX_EXTENDED_BINS`].
    ExtensionTooLarge,
}

/// Bins added by an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extension {
    pub front: usize,
    pub back: usize,
}

// =============================================================================
// Axis
// =============================================================================

/// Edges `origin + (first + k) * width` for `k` in `0..=nbins`, in the
/// equidistant space of a constant-width or log10 axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct UniformParameters {
    pub origin: f64,
    pub first: i64,
    pub width: f64,
    pub nbins: usize,
}

#[derive(Debug, Clone)]
enum Edges {
    Uniform(UniformEdges),
    Generic(GenericEdges),
}

/// One histogram dimension.
#[derive(Debug, Clone)]
pub struct Axis {
    edges: Edges,
    label: String,
    name: String,
    has_underflow_bin: bool,
    has_overflow_bin: bool,
    is_extendable: bool,
    /// Lower edge of the underflow bin, `None` for unbounded.
    underflow_edge: Option<Coord>,
    /// Upper edge of the overflow bin, `None` for unbounded.
    overflow_edge: Option<Coord>,
}

impl Axis {
    /// Axis of `nbins` bins of width `width` starting at `start`.
    pub fn constant_width(
        start: f64,
        width: f64,
        nbins: usize,
        options: &AxisOptions,
    ) -> Result<Self> {
        Self::uniform(Transform::Identity, start, width, nbins, options)
    }

    /// Axis of `nbins` bins of constant width `width` in log10 space,
    /// starting at the positive value `start`.
    pub fn log10(start: f64, width: f64, nbins: usize, options: &AxisOptions) -> Result<Self> {
        if !(start > 0.0) {
            return Err(HistError::NonPositiveLogRange { start });
        }
        Self::uniform(Transform::Log10, start, width, nbins, options)
    }

    /// Axis with arbitrary strictly increasing edges.
    pub fn generic(edges: Vec<Coord>, options: &AxisOptions) -> Result<Self> {
        options.validate()?;
        if options.extendable {
            return Err(HistError::NotExtendable { kind: "generic" });
        }
        let edges = GenericEdges::new(edges)?;
        Ok(Self::with_edges(Edges::Generic(edges), options))
    }

    fn uniform(
        transform: Transform,
        start: f64,
        width: f64,
        nbins: usize,
        options: &AxisOptions,
    ) -> Result<Self> {
        options.validate()?;
        if !start.is_finite() {
            return Err(HistError::NonFiniteEdge { index: 0 });
        }
        if !(width > 0.0 && width.is_finite()) {
            return Err(HistError::InvalidWidth { width });
        }
        if nbins == 0 {
            return Err(HistError::TooFewEdges { got: 1 });
        }
        let cap = options.capacity();
        let origin = transform.forward(start);
        let edges = UniformEdges::new(transform, origin, width, nbins, (cap, cap));
        Ok(Self::with_edges(Edges::Uniform(edges), options))
    }

    fn with_edges(edges: Edges, options: &AxisOptions) -> Self {
        let oor = options.has_boundary_bins();
        Self {
            edges,
            label: options.label.clone(),
            name: options.name.clone(),
            has_underflow_bin: oor,
            has_overflow_bin: oor,
            is_extendable: options.extendable,
            underflow_edge: None,
            overflow_edge: None,
        }
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn kind(&self) -> AxisKind {
        match &self.edges {
            Edges::Uniform(u) if u.transform() == Transform::Log10 => AxisKind::Log10,
            Edges::Uniform(_) => AxisKind::ConstantWidth,
            Edges::Generic(_) => AxisKind::Generic,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn has_underflow_bin(&self) -> bool {
        self.has_underflow_bin
    }

    pub fn has_overflow_bin(&self) -> bool {
        self.has_overflow_bin
    }

    pub fn is_extendable(&self) -> bool {
        self.is_extendable
    }

    /// Number of normal bins.
    pub fn nbins(&self) -> usize {
        match &self.edges {
            Edges::Uniform(u) => u.nbins(),
            Edges::Generic(g) => g.nbins(),
        }
    }

    /// Number of slots including underflow and overflow bins.
    pub fn total_slots(&self) -> usize {
        self.nbins() + self.has_underflow_bin as usize + self.has_overflow_bin as usize
    }

    /// Reserve currently free before the range (extendable axes only).
    pub fn front_capacity(&self) -> usize {
        self.headroom().map_or(0, Headroom::front)
    }

    /// Reserve currently free after the range (extendable axes only).
    pub fn back_capacity(&self) -> usize {
        self.headroom().map_or(0, Headroom::back)
    }

    /// Reserve restored in front whenever the axis reallocates.
    pub fn max_front_capacity(&self) -> usize {
        self.headroom().map_or(0, Headroom::max_front)
    }

    /// Reserve restored at the back whenever the axis reallocates.
    pub fn max_back_capacity(&self) -> usize {
        self.headroom().map_or(0, Headroom::max_back)
    }

    fn headroom(&self) -> Option<&Headroom> {
        match &self.edges {
            Edges::Uniform(u) if self.is_extendable => Some(u.headroom()),
            _ => None,
        }
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Normal edges, `nbins() + 1` values.
    pub fn edges(&self) -> Vec<Coord> {
        match &self.edges {
            Edges::Uniform(u) => u.value_edges().into_iter().map(Coord::Float).collect(),
            Edges::Generic(g) => g.edges().to_vec(),
        }
    }

    /// Outer edge of the underflow bin, `None` if unbounded.
    pub fn underflow_edge(&self) -> Option<&Coord> {
        self.underflow_edge.as_ref()
    }

    /// Outer edge of the overflow bin, `None` if unbounded.
    pub fn overflow_edge(&self) -> Option<&Coord> {
        self.overflow_edge.as_ref()
    }

    /// Numeric normal edges; edges without a numeric value are NaN.
    fn numeric_edges(&self) -> Vec<f64> {
        match &self.edges {
            Edges::Uniform(u) => u.value_edges(),
            Edges::Generic(g) => g
                .edges()
                .iter()
                .map(|c| c.as_f64().unwrap_or(f64::NAN))
                .collect(),
        }
    }

    /// All slot boundaries, `total_slots() + 1` values, with unbounded
    /// boundary bins reaching to -inf / +inf.
    pub fn binedges(&self) -> Array1<f64> {
        let outer = |edge: &Option<Coord>, inf: f64| {
            edge.as_ref()
                .map_or(inf, |c| c.as_f64().unwrap_or(f64::NAN))
        };
        let mut out = Vec::with_capacity(self.total_slots() + 1);
        if self.has_underflow_bin {
            out.push(outer(&self.underflow_edge, f64::NEG_INFINITY));
        }
        out.extend(self.numeric_edges());
        if self.has_overflow_bin {
            out.push(outer(&self.overflow_edge, f64::INFINITY));
        }
        Array1::from(out)
    }

    /// Lower boundary of each slot.
    pub fn lower_binedges(&self) -> Array1<f64> {
        let edges = self.binedges();
        edges.slice(ndarray::s![..-1]).to_owned()
    }

    /// Upper boundary of each slot.
    pub fn upper_binedges(&self) -> Array1<f64> {
        let edges = self.binedges();
        edges.slice(ndarray::s![1..]).to_owned()
    }

    /// Center of each slot; boundary slots are -inf / +inf.
    pub fn bincenters(&self) -> Array1<f64> {
        self.per_slot(|lo, hi| 0.5 * (lo + hi), f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Width of each slot; boundary slots are infinitely wide.
    pub fn binwidths(&self) -> Array1<f64> {
        self.per_slot(|lo, hi| hi - lo, f64::INFINITY, f64::INFINITY)
    }

    fn per_slot(&self, normal: impl Fn(f64, f64) -> f64, under: f64, over: f64) -> Array1<f64> {
        let edges = self.numeric_edges();
        let mut out = Vec::with_capacity(self.total_slots());
        if self.has_underflow_bin {
            out.push(under);
        }
        out.extend(edges.windows(2).map(|w| normal(w[0], w[1])));
        if self.has_overflow_bin {
            out.push(over);
        }
        Array1::from(out)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Classifies `value`; `None` if it cannot be ordered against the edges.
    pub fn bin_index_for(&self, value: &Coord) -> Option<BinLookup> {
        let located = match &self.edges {
            Edges::Uniform(u) => u.locate(value.as_f64()?)?,
            Edges::Generic(g) => g.locate(value)?,
        };
        let lookup = match located {
            Locate::Inside(i) => BinLookup::Normal(i),
            Locate::Below(reach) if self.is_extendable => match reach {
                Reach::Bins(n) => BinLookup::ExtendBefore(n),
                Reach::TooFar => BinLookup::ExtensionTooLarge,
                Reach::Never => BinLookup::OutOfRange,
            },
            Locate::Above(reach) if self.is_extendable => match reach {
                Reach::Bins(n) => BinLookup::ExtendAfter(n),
                Reach::TooFar => BinLookup::ExtensionTooLarge,
                Reach::Never => BinLookup::OutOfRange,
            },
            Locate::Below(_) => match &self.underflow_edge {
                Some(edge) if value.try_lt(edge)? => BinLookup::OutOfRange,
                _ => BinLookup::Underflow,
            },
            Locate::Above(_) => match &self.overflow_edge {
                Some(edge) if !value.try_lt(edge)? => BinLookup::OutOfRange,
                _ => BinLookup::Overflow,
            },
        };
        Some(lookup)
    }

    /// Slot of a lookup result, `None` if the entry has to be discarded.
    #[inline]
    pub fn slot(&self, lookup: BinLookup) -> Option<usize> {
        let under = self.has_underflow_bin as usize;
        match lookup {
            BinLookup::Normal(i) => Some(i + under),
            BinLookup::Underflow if self.has_underflow_bin => Some(0),
            BinLookup::Overflow if self.has_overflow_bin => Some(under + self.nbins()),
            _ => None,
        }
    }

    // =========================================================================
    // Extension
    // =========================================================================

    /// Grows an extendable axis until `value` lies within its normal range.
    ///
    /// Reserved capacity is consumed first; the edge buffer is reallocated
    /// with fresh reserve only when it runs out.
    pub fn extend_to_include(&mut self, value: &Coord) -> Result<Extension> {
        if !self.is_extendable {
            return Err(HistError::NotExtendable {
                kind: match self.kind() {
                    AxisKind::Generic => "generic",
                    _ => "non-extendable",
                },
            });
        }
        let lookup = self.bin_index_for(value).ok_or(HistError::UnorderedValue)?;
        if lookup == BinLookup::ExtensionTooLarge {
            return Err(HistError::ExtensionTooLarge {
                axis: 0,
                max: MAX_EXTENDED_BINS,
            });
        }
        Ok(self.apply_extension(lookup))
    }

    /// Applies an `ExtendBefore` / `ExtendAfter` lookup; other lookups are a no-op.
    pub(crate) fn apply_extension(&mut self, lookup: BinLookup) -> Extension {
        let Edges::Uniform(u) = &mut self.edges else {
            return Extension::default();
        };
        let (extension, realloc) = match lookup {
            BinLookup::ExtendBefore(n) => (Extension { front: n, back: 0 }, u.extend_front(n)),
            BinLookup::ExtendAfter(n) => (Extension { front: 0, back: n }, u.extend_back(n)),
            _ => return Extension::default(),
        };
        if realloc {
            log::debug!(
                "axis `{}` reallocated its edges after growing by {:?}",
                self.name,
                extension
            );
        }
        extension
    }

    // =========================================================================
    // Derived axes
    // =========================================================================

    /// Axis covering slots `start..stop` of this one.
    pub(crate) fn sliced(&self, start: usize, stop: usize) -> Self {
        let under = self.has_underflow_bin as usize;
        let n = self.nbins();
        let keeps_under = self.has_underflow_bin && start == 0;
        let keeps_over = self.has_overflow_bin && stop == self.total_slots();
        let hi = stop.saturating_sub(under).min(n);
        let lo = start.saturating_sub(under).min(hi);

        let edges = match &self.edges {
            Edges::Uniform(u) => Edges::Uniform(u.sliced(lo, hi)),
            Edges::Generic(g) => Edges::Generic(g.sliced(lo, hi)),
        };
        Self {
            edges,
            label: self.label.clone(),
            name: self.name.clone(),
            has_underflow_bin: keeps_under,
            has_overflow_bin: keeps_over,
            is_extendable: self.is_extendable,
            underflow_edge: self.underflow_edge.clone().filter(|_| keeps_under),
            overflow_edge: self.overflow_edge.clone().filter(|_| keeps_over),
        }
    }

    /// Axis whose normal bins are consecutive groups of `group` bins.
    ///
    /// Trailing bins that do not fill a group go to the overflow bin, which
    /// is created if missing with the old last edge as its upper edge. On an
    /// extendable axis they are dropped.
    pub(crate) fn merged(&self, group: usize) -> Self {
        let remainder = self.nbins() % group;
        let edges = match &self.edges {
            Edges::Uniform(u) => Edges::Uniform(u.merged(group)),
            Edges::Generic(g) => Edges::Generic(g.merged(group)),
        };
        let creates_overflow = remainder > 0 && !self.is_extendable && !self.has_overflow_bin;
        let overflow_edge = if creates_overflow {
            self.edges().last().cloned()
        } else {
            self.overflow_edge.clone()
        };
        Self {
            edges,
            label: self.label.clone(),
            name: self.name.clone(),
            has_underflow_bin: self.has_underflow_bin,
            has_overflow_bin: self.has_overflow_bin || creates_overflow,
            is_extendable: self.is_extendable,
            underflow_edge: self.underflow_edge.clone(),
            overflow_edge,
        }
    }

    /// Same kind, edges, boundary bins and extendability.
    ///
    /// Labels, names and reserve are ignored.
    pub fn is_compatible(&self, other: &Axis) -> bool {
        let same_edges = match (&self.edges, &other.edges) {
            (Edges::Uniform(a), Edges::Uniform(b)) => {
                a.transform() == b.transform() && a.edges() == b.edges()
            }
            (Edges::Generic(a), Edges::Generic(b)) => a.edges() == b.edges(),
            _ => false,
        };
        same_edges
            && self.has_underflow_bin == other.has_underflow_bin
            && self.has_overflow_bin == other.has_overflow_bin
            && self.is_extendable == other.is_extendable
            && self.underflow_edge == other.underflow_edge
            && self.overflow_edge == other.overflow_edge
    }

    // =========================================================================
    // Persistence support
    // =========================================================================

    /// Equidistant edge parameters of a constant-width or log10 axis;
    /// `None` for generic axes.
    pub(crate) fn uniform_parameters(&self) -> Option<UniformParameters> {
        match &self.edges {
            Edges::Uniform(u) => Some(UniformParameters {
                origin: u.origin(),
                first: u.first(),
                width: u.width(),
                nbins: u.nbins(),
            }),
            Edges::Generic(_) => None,
        }
    }

    /// Rebuilds an axis from stored parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        kind: AxisKind,
        uniform: Option<UniformParameters>,
        generic_edges: Option<Vec<Coord>>,
        flags: (bool, bool, bool),
        capacity: (usize, usize),
        outer: (Option<Coord>, Option<Coord>),
        label: String,
        name: String,
    ) -> Result<Self> {
        let (has_underflow_bin, has_overflow_bin, is_extendable) = flags;
        if is_extendable && (has_underflow_bin || has_overflow_bin) {
            return Err(HistError::ExtendableWithBoundaryBins);
        }
        let edges = match (kind, uniform, generic_edges) {
            (AxisKind::Generic, _, Some(edges)) => {
                if is_extendable {
                    return Err(HistError::NotExtendable { kind: "generic" });
                }
                Edges::Generic(GenericEdges::new(edges)?)
            }
            (AxisKind::ConstantWidth | AxisKind::Log10, Some(params), _) => {
                let UniformParameters {
                    origin,
                    first,
                    width,
                    nbins,
                } = params;
                if !(width > 0.0 && width.is_finite()) {
                    return Err(HistError::InvalidWidth { width });
                }
                if !(origin + first as f64 * width).is_finite() {
                    return Err(HistError::NonFiniteEdge { index: 0 });
                }
                if nbins == 0 {
                    return Err(HistError::TooFewEdges { got: 1 });
                }
                let transform = if kind == AxisKind::Log10 {
                    Transform::Log10
                } else {
                    Transform::Identity
                };
                let capacity = if is_extendable { capacity } else { (0, 0) };
                Edges::Uniform(UniformEdges::with_offset(
                    transform, origin, first, width, nbins, capacity,
                ))
            }
            _ => {
                return Err(HistError::InvalidSnapshot(format!(
                    "axis `{name}` of kind {} is missing its edge description",
                    kind.name()
                )))
            }
        };
        Ok(Self {
            edges,
            label,
            name,
            has_underflow_bin,
            has_overflow_bin,
            is_extendable,
            underflow_edge: outer.0.filter(|_| has_underflow_bin),
            overflow_edge: outer.1.filter(|_| has_overflow_bin),
        })
    }
}
