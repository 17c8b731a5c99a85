//! Axis construction options with builder pattern.
//!
//! [`AxisOptions`] carries the metadata and range policy shared by every axis
//! kind. The builder validates the combination at build time.
//!
//! # Example
//!
//! ```
//! use ndhist::axis::AxisOptions;
//!
//! let opts = AxisOptions::builder()
//!     .name("energy")
//!     .label("E [GeV]")
//!     .extendable(true)
//!     .extra_capacity(16)
//!     .build()
//!     .unwrap();
//! assert!(!opts.has_boundary_bins());
//! ```

use bon::Builder;

use crate::error::{HistError, Result};

/// Metadata and range policy for a new axis.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct AxisOptions {
    /// Axis label.
    #[builder(default, into)]
    pub label: String,

    /// Axis name, the key of the axis in named-column fills.
    /// Empty names become `a{i}` inside a histogram.
    #[builder(default, into)]
    pub name: String,

    /// Whether underflow and overflow bins are added.
    /// `None` means: add them unless the axis is extendable.
    pub oor_bins: Option<bool>,

    /// Whether the axis grows to include out-of-range values. Default: false.
    #[builder(default)]
    pub extendable: bool,

    /// Reserved bins before and after the range of an extendable axis.
    /// Ignored for non-extendable axes. Default: 0.
    #[builder(default)]
    pub extra_capacity: usize,
}

impl<S: axis_options_builder::IsComplete> AxisOptionsBuilder<S> {
    /// Build and validate the options.
    ///
    /// # Errors
    ///
    /// [`HistError::ExtendableWithBoundaryBins`] if `oor_bins(true)` is
    /// combined with `extendable(true)`.
    pub fn build(self) -> Result<AxisOptions> {
        let options = self.__build_internal();
        options.validate()?;
        Ok(options)
    }
}

impl AxisOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.extendable && self.oor_bins == Some(true) {
            return Err(HistError::ExtendableWithBoundaryBins);
        }
        Ok(())
    }

    /// Whether the resulting axis has underflow and overflow bins.
    pub fn has_boundary_bins(&self) -> bool {
        self.oor_bins.unwrap_or(!self.extendable)
    }

    /// Reserve per side actually applied to the axis.
    pub(crate) fn capacity(&self) -> usize {
        if self.extendable {
            self.extra_capacity
        } else {
            0
        }
    }
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            label: String::new(),
            name: String::new(),
            oor_bins: None,
            extendable: false,
            extra_capacity: 0,
        }
    }
}
