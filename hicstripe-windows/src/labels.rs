use ndarray::{Array2, s};

use hicstripe_core::config::EnrichmentThreshold;
use hicstripe_core::models::Feature2D;
use hicstripe_core::traits::SpatialFeatureIndex;

use crate::orientation::{Orientation, Window};

/// Label grids for one window, in the window's own (uncanonicalized) shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGrids {
    pub labels: Array2<u8>,
    /// Intensity-gated labels, present only when intensity labeling is on.
    pub intensity: Option<Array2<u8>>,
    /// At least one feature passed the orientation filter.
    pub found: bool,
}

impl LabelGrids {
    /// Canonicalize both grids for `orientation`.
    pub fn canonicalize(self, orientation: Orientation) -> Self {
        LabelGrids {
            labels: orientation.canonicalize(self.labels),
            intensity: self.intensity.map(|g| orientation.canonicalize(g)),
            found: self.found,
        }
    }
}

///
/// Footprint of a feature inside a window, clipped to the window bounds.
///
/// `None` if the feature falls entirely outside.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Footprint {
    row0: usize,
    row1: usize,
    col0: usize,
    col1: usize,
}

impl Footprint {
    fn clipped(
        start_row: i64,
        start_col: i64,
        row_len: i64,
        col_len: i64,
        (rows, cols): (usize, usize),
    ) -> Option<Self> {
        let row0 = start_row.max(0);
        let col0 = start_col.max(0);
        let row1 = (start_row + row_len).min(rows as i64);
        let col1 = (start_col + col_len).min(cols as i64);
        if row0 >= row1 || col0 >= col1 {
            return None;
        }
        Some(Footprint {
            row0: row0 as usize,
            row1: row1 as usize,
            col0: col0 as usize,
            col1: col1 as usize,
        })
    }
}

///
/// Stamps the footprints of annotated features onto a window's label grid.
///
pub struct FeatureLabeler<'a> {
    index: &'a dyn SpatialFeatureIndex,
    chrom_index: u32,
    resolution: u32,
    ignore_orientation: bool,
    /// Threshold policy of the intensity grid, `None` when intensity labeling is off.
    enrichment: Option<EnrichmentThreshold>,
}

impl<'a> FeatureLabeler<'a> {
    pub fn new(
        index: &'a dyn SpatialFeatureIndex,
        chrom_index: u32,
        resolution: u32,
        ignore_orientation: bool,
        enrichment: Option<EnrichmentThreshold>,
    ) -> Self {
        Self {
            index,
            chrom_index,
            resolution,
            ignore_orientation,
            enrichment,
        }
    }

    ///
    /// Label `window`, whose extracted values are `data`.
    ///
    /// Features are looked up by the window's base-pair rectangle. Every feature accepted by
    /// the orientation filter stamps a `row_length × col_length` block of ones starting at its
    /// first bin, clipped to the window. The intensity grid only gets the footprint cells whose
    /// value in `data` is above the enrichment threshold.
    ///
    pub fn label(&self, window: &Window, data: &Array2<f64>) -> LabelGrids {
        let shape = window.shape();
        let mut labels = Array2::<u8>::zeros(shape);
        let mut intensity = self.enrichment.map(|_| Array2::<u8>::zeros(shape));
        let mut found = false;

        let bp_rect = window.rect.to_bp(self.resolution);
        let features = self
            .index
            .contained_features(self.chrom_index, self.chrom_index, &bp_rect);

        for feature in features.iter() {
            let row_len = feature.row_length(self.resolution);
            let col_len = feature.col_length(self.resolution);
            if !self.ignore_orientation && !window.orientation().accepts(row_len, col_len) {
                continue;
            }
            found = true;

            let Some(fp) = self.footprint(window, feature, row_len, col_len) else {
                continue;
            };
            labels
                .slice_mut(s![fp.row0..fp.row1, fp.col0..fp.col1])
                .fill(1);

            if let (Some(grid), Some(policy)) = (intensity.as_mut(), self.enrichment) {
                stamp_enriched(grid, data, fp, policy);
            }
        }

        LabelGrids {
            labels,
            intensity,
            found,
        }
    }

    fn footprint(
        &self,
        window: &Window,
        feature: &Feature2D,
        row_len: i64,
        col_len: i64,
    ) -> Option<Footprint> {
        Footprint::clipped(
            feature.start_row_bin(self.resolution) - window.rect.row_start,
            feature.start_col_bin(self.resolution) - window.rect.col_start,
            row_len,
            col_len,
            window.shape(),
        )
    }
}

fn stamp_enriched(
    grid: &mut Array2<u8>,
    data: &Array2<f64>,
    fp: Footprint,
    policy: EnrichmentThreshold,
) {
    let values = data.slice(s![fp.row0..fp.row1, fp.col0..fp.col1]);
    let threshold = match policy {
        EnrichmentThreshold::Fixed(t) => t,
        EnrichmentThreshold::FootprintMean => values.mean().unwrap_or(0.0),
    };

    grid.slice_mut(s![fp.row0..fp.row1, fp.col0..fp.col1])
        .zip_mut_with(&values, |label, v| {
            if *v > threshold {
                *label = 1;
            }
        });
}
