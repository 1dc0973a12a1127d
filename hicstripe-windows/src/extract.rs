use std::fmt::{self, Display};

use log::warn;
use ndarray::Array2;

use hicstripe_core::models::{Normalization, Zoom};
use hicstripe_core::traits::{ContactMatrixStore, ZoomData};

use crate::errors::{Result, WindowError};
use crate::orientation::Window;

/// Why a window produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The store has no expected baseline for this zoom and normalization.
    ExpectedUnavailable {
        zoom: Zoom,
        normalization: Normalization,
    },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ExpectedUnavailable {
                zoom,
                normalization,
            } => write!(f, "no expected values for {} with {}", zoom, normalization),
        }
    }
}

/// Outcome of extracting one window.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Extracted(Array2<f64>),
    Skipped(SkipReason),
}

///
/// Pulls the values under a window out of one zoom level of a contact matrix: either the
/// normalized observed counts or the bounded log observed/expected ratio.
///
pub struct WindowExtractor<'a> {
    store: &'a dyn ContactMatrixStore,
    zoom_data: &'a dyn ZoomData,
    normalization: Normalization,
    observed_over_expected: bool,
    oe_log_threshold: f64,
}

impl<'a> WindowExtractor<'a> {
    pub fn new(
        store: &'a dyn ContactMatrixStore,
        zoom_data: &'a dyn ZoomData,
        normalization: Normalization,
        observed_over_expected: bool,
        oe_log_threshold: f64,
    ) -> Self {
        Self {
            store,
            zoom_data,
            normalization,
            observed_over_expected,
            oe_log_threshold,
        }
    }

    ///
    /// Extract the grid under `window`, in the window's own (uncanonicalized) shape.
    ///
    /// A missing expected baseline is not an error: the window is reported as
    /// [`Extraction::Skipped`] and the scan carries on.
    ///
    pub fn extract(&self, window: &Window) -> Result<Extraction> {
        let grid = if self.observed_over_expected {
            let zoom = self.zoom_data.zoom();
            let Some(expected) = self.store.expected_values(&zoom, self.normalization) else {
                let reason = SkipReason::ExpectedUnavailable {
                    zoom,
                    normalization: self.normalization,
                };
                warn!("Skipping window at {}: {}", window.rect, reason);
                return Ok(Extraction::Skipped(reason));
            };
            self.zoom_data.oe_region(
                &window.rect,
                self.normalization,
                expected,
                self.oe_log_threshold,
            )?
        } else {
            self.zoom_data.raw_region(&window.rect, self.normalization)?
        };

        let (rows, cols) = window.shape();
        if grid.dim() != (rows, cols) {
            let (actual_rows, actual_cols) = grid.dim();
            return Err(WindowError::ShapeMismatch {
                rows,
                cols,
                actual_rows,
                actual_cols,
            });
        }

        Ok(Extraction::Extracted(grid))
    }
}
