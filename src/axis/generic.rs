//! Edges of arbitrary ordered values.
//!
//! Lookup is a binary search that only uses the strict `<` of [`Coord`];
//! no arithmetic on the values is assumed. Generic axes never extend.

use crate::coord::Coord;
use crate::error::{HistError, Result};

use super::{Locate, Reach};

#[derive(Debug, Clone)]
pub(crate) struct GenericEdges {
    edges: Vec<Coord>,
}

impl GenericEdges {
    /// Validates that `edges` has at least two strictly increasing values.
    pub(crate) fn new(edges: Vec<Coord>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(HistError::TooFewEdges { got: edges.len() });
        }
        for (i, pair) in edges.windows(2).enumerate() {
            if pair[0].try_lt(&pair[1]) != Some(true) {
                return Err(HistError::EdgesNotIncreasing { index: i + 1 });
            }
        }
        Ok(Self { edges })
    }

    pub(crate) fn edges(&self) -> &[Coord] {
        &self.edges
    }

    pub(crate) fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Locates `value`; `None` if it cannot be ordered against the edges.
    pub(crate) fn locate(&self, value: &Coord) -> Option<Locate> {
        let n = self.nbins();
        if value.try_lt(&self.edges[0])? {
            return Some(Locate::Below(Reach::Never));
        }
        if !value.try_lt(&self.edges[n])? {
            return Some(Locate::Above(Reach::Never));
        }

        // First edge strictly greater than `value`.
        let (mut lo, mut hi) = (1, n);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if value.try_lt(&self.edges[mid])? {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Some(Locate::Inside(lo - 1))
    }

    pub(crate) fn sliced(&self, lo: usize, hi: usize) -> Self {
        Self {
            edges: self.edges[lo..=hi].to_vec(),
        }
    }

    pub(crate) fn merged(&self, group: usize) -> Self {
        let kept = self.nbins() / group * group;
        Self {
            edges: self.edges[..=kept].iter().step_by(group).cloned().collect(),
        }
    }
}
