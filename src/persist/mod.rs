//! Histogram persistence.
//!
//! Histograms are saved as a versioned [`HistogramSnapshot`] that is
//! independent of the runtime types, and encoded as JSON with `serde_json`.
//!
//! # Key Types
//!
//! - [`HistogramSnapshot`] - Serializable form of a histogram
//! - [`PersistError`] - Encoding, validation and histogram errors
//!
//! # Example
//!
//! ```
//! use ndhist::axis::{linear, AxisOptions};
//! use ndhist::Histogram;
//!
//! let axis = linear(0.0, 4.0, 1.0, &AxisOptions::default()).unwrap();
//! let mut h = Histogram::<f64>::new(vec![axis]).unwrap().with_title("demo");
//! h.fill_point(&[2.5], 3.0).unwrap();
//!
//! let json = h.to_json().unwrap();
//! let restored = Histogram::<f64>::from_json(&json).unwrap();
//! assert_eq!(restored.title(), "demo");
//! assert_eq!(restored.full_bincontent(), h.full_bincontent());
//! ```

mod convert;
pub mod schema;

use std::io::{Read, Write};

pub use schema::{HistogramSnapshot, ValueColumn, SNAPSHOT_VERSION};

use crate::error::HistError;
use crate::histogram::Histogram;
use crate::value::BinValue;

/// Errors raised while saving or loading a histogram.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Validation(String),

    #[error(transparent)]
    Hist(#[from] HistError),
}

impl<V: BinValue> Histogram<V> {
    /// Encodes the histogram as a JSON snapshot.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(&self.to_snapshot()?)?)
    }

    /// Decodes a histogram from a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Writes a JSON snapshot to `writer`.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        serde_json::to_writer(writer, &self.to_snapshot()?)?;
        Ok(())
    }

    /// Reads a JSON snapshot from `reader`.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, PersistError> {
        Self::from_snapshot(serde_json::from_reader(reader)?)
    }
}
