use ndarray::Array2;

use crate::errors::SourceError;
use crate::models::{BinRect, BpRect, Chromosome, ExpectedValues, Feature2D, Normalization, Zoom};

/// A contact matrix store: the chromosomes it covers, their intra-chromosomal matrices and
/// the zoom levels and expected baselines available for them.
///
/// Stores are shared read-only by every scan task, hence `Send + Sync`.
pub trait ContactMatrixStore: Send + Sync {
    /// Chromosomes in store order. May include the whole-genome pseudo entry.
    fn chromosomes(&self) -> Vec<Chromosome>;

    /// The intra-chromosomal matrix of `chrom`, if the store has one.
    fn matrix(&self, chrom: &Chromosome) -> Option<&dyn ContactMatrix>;

    /// The zoom level binning at `resolution` bp, if the store has one.
    fn zoom_for_resolution(&self, resolution: u32) -> Option<Zoom>;

    /// Expected baseline for a zoom and normalization, if it is available.
    fn expected_values(&self, zoom: &Zoom, norm: Normalization) -> Option<&ExpectedValues>;
}

pub trait ContactMatrix: Send + Sync {
    fn zoom_data(&self, zoom: &Zoom) -> Option<&dyn ZoomData>;
}

/// Value source for one matrix at one zoom level.
///
/// Both extraction methods return a dense `rect.num_rows() x rect.num_cols()` grid. Cells
/// outside the matrix are zero and cells below the diagonal mirror their upper-triangle entry.
pub trait ZoomData: Send + Sync {
    fn zoom(&self) -> Zoom;

    /// Normalized observed values.
    fn raw_region(&self, rect: &BinRect, norm: Normalization) -> Result<Array2<f64>, SourceError>;

    /// Observed over expected, as a log ratio bounded to `[-threshold, threshold]`.
    fn oe_region(
        &self,
        rect: &BinRect,
        norm: Normalization,
        expected: &ExpectedValues,
        threshold: f64,
    ) -> Result<Array2<f64>, SourceError>;
}

pub trait SpatialFeatureIndex: Send + Sync {
    /// All features between `chr1` and `chr2` whose footprint intersects `rect`.
    fn contained_features(&self, chr1: u32, chr2: u32, rect: &BpRect) -> Vec<Feature2D>;
}
