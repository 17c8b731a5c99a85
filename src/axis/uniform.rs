//! Constant-width edges, optionally in log10 space.
//!
//! Edges are `origin + k * width` for consecutive integers `k` in a
//! transformed space (identity for linear axes, `log10` for logarithmic
//! ones). Lookup is arithmetic and then corrected against the materialized
//! edges, so floating point rounding never puts a value on the wrong side of
//! an edge.
//!
//! The edge buffer keeps reserved slots in front of and behind the logical
//! range. Those slots already hold the edges an extension would create, so
//! extension within the reserve only moves the logical window.

use crate::headroom::Headroom;

use super::{Locate, Reach, MAX_EXTENDED_BINS};

// =============================================================================
// Transform
// =============================================================================

/// Space in which the edges are equidistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transform {
    Identity,
    Log10,
}

impl Transform {
    #[inline]
    pub(crate) fn forward(self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            // Non-positive values lie below every log10 edge.
            Transform::Log10 if value <= 0.0 => f64::NEG_INFINITY,
            Transform::Log10 => value.log10(),
        }
    }

    #[inline]
    pub(crate) fn inverse(self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            Transform::Log10 => 10f64.powf(value),
        }
    }
}

/// Number of bins of width `width` needed to cover `span`.
///
/// Spans that are an integral multiple of the width up to rounding noise
/// (`3.0 / 0.1`) do not get an extra bin.
pub(crate) fn bin_count(span: f64, width: f64) -> usize {
    let raw = span / width;
    let rounded = raw.round();
    if (raw - rounded).abs() <= 1e-9 * rounded.max(1.0) {
        rounded as usize
    } else {
        raw.ceil() as usize
    }
}

// =============================================================================
// UniformEdges
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct UniformEdges {
    transform: Transform,
    origin: f64,
    width: f64,
    /// Index of the first logical edge relative to `origin`.
    first: i64,
    nbins: usize,
    /// Physical edge buffer, logical window starts at `headroom.front()`.
    buffer: Vec<f64>,
    headroom: Headroom,
}

impl UniformEdges {
    /// `origin` and `width` are given in the transformed space.
    pub(crate) fn new(
        transform: Transform,
        origin: f64,
        width: f64,
        nbins: usize,
        capacity: (usize, usize),
    ) -> Self {
        Self::with_offset(transform, origin, 0, width, nbins, capacity)
    }

    /// Edge set whose first logical edge is `origin + first * width`.
    pub(crate) fn with_offset(
        transform: Transform,
        origin: f64,
        first: i64,
        width: f64,
        nbins: usize,
        capacity: (usize, usize),
    ) -> Self {
        let mut edges = Self {
            transform,
            origin,
            width,
            first,
            nbins,
            buffer: Vec::new(),
            headroom: Headroom::new(capacity.0, capacity.1),
        };
        edges.rebuild();
        edges
    }

    pub(crate) fn transform(&self) -> Transform {
        self.transform
    }

    pub(crate) fn origin(&self) -> f64 {
        self.origin
    }

    /// Index of the first logical edge relative to the origin.
    pub(crate) fn first(&self) -> i64 {
        self.first
    }

    pub(crate) fn width(&self) -> f64 {
        self.width
    }

    pub(crate) fn nbins(&self) -> usize {
        self.nbins
    }

    pub(crate) fn headroom(&self) -> &Headroom {
        &self.headroom
    }

    /// First logical edge in the transformed space.
    pub(crate) fn start(&self) -> f64 {
        self.edge_at(self.first)
    }

    /// Logical edges in the transformed space.
    #[inline]
    pub(crate) fn edges(&self) -> &[f64] {
        let front = self.headroom.front();
        &self.buffer[front..front + self.nbins + 1]
    }

    /// Logical edges in the value space.
    pub(crate) fn value_edges(&self) -> Vec<f64> {
        self.edges()
            .iter()
            .map(|&e| self.transform.inverse(e))
            .collect()
    }

    #[inline]
    fn edge_at(&self, k: i64) -> f64 {
        self.origin + k as f64 * self.width
    }

    fn rebuild(&mut self) {
        let lead = self.first - self.headroom.front() as i64;
        let len = self.headroom.front() + self.nbins + 1 + self.headroom.back();
        self.buffer = (0..len as i64).map(|p| self.edge_at(lead + p)).collect();
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Locates `value`; `None` if it is NaN.
    pub(crate) fn locate(&self, value: f64) -> Option<Locate> {
        if value.is_nan() {
            return None;
        }
        let t = self.transform.forward(value);
        let edges = self.edges();
        let n = self.nbins;
        if t < edges[0] {
            return Some(Locate::Below(self.front_extension(t)));
        }
        if t >= edges[n] {
            return Some(Locate::Above(self.back_extension(t)));
        }

        let mut i = (((t - edges[0]) / self.width).floor() as usize).min(n - 1);
        while i > 0 && t < edges[i] {
            i -= 1;
        }
        while i + 1 < n && t >= edges[i + 1] {
            i += 1;
        }
        Some(Locate::Inside(i))
    }

    /// Bins to prepend so that `t` is covered.
    fn front_extension(&self, t: f64) -> Reach {
        if !t.is_finite() {
            return Reach::Never;
        }
        let budget = MAX_EXTENDED_BINS.saturating_sub(self.nbins);
        let need = ((self.start() - t) / self.width).ceil().max(1.0);
        if !(need <= budget as f64) {
            return Reach::TooFar;
        }
        let mut n = need as usize;
        while n <= budget && t < self.edge_at(self.first - n as i64) {
            n += 1;
        }
        if n > budget {
            return Reach::TooFar;
        }
        Reach::Bins(n)
    }

    /// Bins to append so that `t` is covered.
    fn back_extension(&self, t: f64) -> Reach {
        if !t.is_finite() {
            return Reach::Never;
        }
        let budget = MAX_EXTENDED_BINS.saturating_sub(self.nbins);
        let last = self.first + self.nbins as i64;
        let need = ((t - self.edge_at(last)) / self.width).floor().max(0.0) + 1.0;
        if !(need <= budget as f64) {
            return Reach::TooFar;
        }
        let mut n = need as usize;
        while n <= budget && t >= self.edge_at(last + n as i64) {
            n += 1;
        }
        if n > budget {
            return Reach::TooFar;
        }
        Reach::Bins(n)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Prepends `n` bins. Returns `true` if the edge buffer was reallocated.
    pub(crate) fn extend_front(&mut self, n: usize) -> bool {
        let realloc = self.headroom.claim_front(n);
        self.first -= n as i64;
        self.nbins += n;
        if realloc {
            self.rebuild();
        }
        realloc
    }

    /// Appends `n` bins. Returns `true` if the edge buffer was reallocated.
    pub(crate) fn extend_back(&mut self, n: usize) -> bool {
        let realloc = self.headroom.claim_back(n);
        self.nbins += n;
        if realloc {
            self.rebuild();
        }
        realloc
    }

    /// Edges `lo..=hi` of the logical range.
    pub(crate) fn sliced(&self, lo: usize, hi: usize) -> Self {
        let mut edges = self.clone();
        edges.first += lo as i64;
        edges.nbins = hi - lo;
        edges.headroom = Headroom::new(self.headroom.max_front(), self.headroom.max_back());
        edges.rebuild();
        edges
    }

    /// Every `group`-th edge; trailing bins that do not fill a group are dropped.
    pub(crate) fn merged(&self, group: usize) -> Self {
        Self::new(
            self.transform,
            self.start(),
            self.width * group as f64,
            self.nbins / group,
            (self.headroom.max_front(), self.headroom.max_back()),
        )
    }
}
