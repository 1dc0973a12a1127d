use fxhash::FxHashMap as HashMap;
use ndarray::Array2;

use hicstripe_core::consts::OE_PSEUDOCOUNT;
use hicstripe_core::errors::SourceError;
use hicstripe_core::models::{BinRect, ExpectedValues, Normalization, Zoom};
use hicstripe_core::traits::ZoomData;

use crate::normalization::{NormVectors, coverage};

///
/// Contacts of one chromosome at one resolution.
///
/// Only the upper triangle (`row <= col`) is stored; lookups below the diagonal are mirrored.
///
#[derive(Debug, Clone)]
pub struct SparseContactMap {
    zoom: Zoom,
    n_bins: u64,
    counts: HashMap<(u64, u64), f64>,
    norms: NormVectors,
}

impl SparseContactMap {
    pub(crate) fn new(zoom: Zoom, n_bins: u64, counts: HashMap<(u64, u64), f64>) -> Self {
        let norms = NormVectors::from_coverage(&coverage(n_bins as usize, &counts));
        SparseContactMap {
            zoom,
            n_bins,
            counts,
            norms,
        }
    }

    pub fn n_bins(&self) -> u64 {
        self.n_bins
    }

    /// Number of stored (upper-triangle) contacts.
    pub fn nnz(&self) -> usize {
        self.counts.len()
    }

    pub fn norm_vectors(&self) -> &NormVectors {
        &self.norms
    }

    ///
    /// Normalized observed value between bins `row` and `col`; zero outside the matrix.
    ///
    pub fn observed(&self, row: i64, col: i64, norm: Normalization) -> f64 {
        if row < 0 || col < 0 || row as u64 >= self.n_bins || col as u64 >= self.n_bins {
            return 0.0;
        }
        let (i, j) = if row <= col {
            (row as u64, col as u64)
        } else {
            (col as u64, row as u64)
        };
        match self.counts.get(&(i, j)) {
            Some(v) => v * self.norms.factor(norm, i as usize, j as usize),
            None => 0.0,
        }
    }

    /// Iterate stored upper-triangle contacts as `(row, col, normalized value)`.
    pub fn normalized_records(
        &self,
        norm: Normalization,
    ) -> impl Iterator<Item = (u64, u64, f64)> + '_ {
        self.counts.iter().map(move |(&(i, j), &v)| {
            (i, j, v * self.norms.factor(norm, i as usize, j as usize))
        })
    }

    fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.n_bins && (col as u64) < self.n_bins
    }
}

impl ZoomData for SparseContactMap {
    fn zoom(&self) -> Zoom {
        self.zoom
    }

    fn raw_region(&self, rect: &BinRect, norm: Normalization) -> Result<Array2<f64>, SourceError> {
        Ok(Array2::from_shape_fn(
            (rect.num_rows(), rect.num_cols()),
            |(i, j)| self.observed(rect.row_start + i as i64, rect.col_start + j as i64, norm),
        ))
    }

    fn oe_region(
        &self,
        rect: &BinRect,
        norm: Normalization,
        expected: &ExpectedValues,
        threshold: f64,
    ) -> Result<Array2<f64>, SourceError> {
        Ok(Array2::from_shape_fn(
            (rect.num_rows(), rect.num_cols()),
            |(i, j)| {
                let row = rect.row_start + i as i64;
                let col = rect.col_start + j as i64;
                if !self.in_bounds(row, col) {
                    return 0.0;
                }
                let obs = self.observed(row, col, norm);
                let exp = expected.at_distance(row.abs_diff(col));
                ((obs + OE_PSEUDOCOUNT) / (exp + OE_PSEUDOCOUNT))
                    .ln()
                    .clamp(-threshold, threshold)
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn map() -> SparseContactMap {
        let mut counts = HashMap::default();
        counts.insert((0, 0), 10.0);
        counts.insert((1, 3), 5.0);
        counts.insert((2, 2), 3.0);
        SparseContactMap::new(Zoom::new(5000), 4, counts)
    }

    #[rstest]
    fn test_raw_region_is_symmetric(map: SparseContactMap) {
        let grid = map
            .raw_region(&BinRect::new(0, 0, 4, 4), Normalization::None)
            .unwrap();
        assert_eq!(grid.dim(), (4, 4));
        assert_eq!(grid[[1, 3]], 5.0);
        assert_eq!(grid[[3, 1]], 5.0);
        assert_eq!(grid[[0, 0]], 10.0);
        assert_eq!(grid[[0, 1]], 0.0);
    }

    #[rstest]
    fn test_raw_region_outside_matrix_is_zero(map: SparseContactMap) {
        let grid = map
            .raw_region(&BinRect::new(-2, 2, 1, 6), Normalization::None)
            .unwrap();
        assert_eq!(grid.dim(), (3, 4));
        // row -2 and -1 are outside, row 0 col 2..6 has no contacts
        assert!(grid.iter().all(|v| *v == 0.0));

        let grid = map
            .raw_region(&BinRect::new(1, 2, 3, 6), Normalization::None)
            .unwrap();
        assert_eq!(grid[[0, 1]], 5.0);
        assert_eq!(grid[[1, 0]], 3.0);
        assert_eq!(grid[[0, 3]], 0.0);
    }

    #[rstest]
    fn test_oe_region_bounded(map: SparseContactMap) {
        let expected = ExpectedValues::new(5000, Normalization::None, vec![0.0, 0.0, 1.0]);
        let grid = map
            .oe_region(&BinRect::new(0, 0, 4, 4), Normalization::None, &expected, 2.0)
            .unwrap();

        // ln(11 / 1) > 2, clamped
        assert_eq!(grid[[0, 0]], 2.0);
        // ln(6 / 2) at distance 2
        assert!((grid[[1, 3]] - 3.0f64.ln()).abs() < 1e-12);
        // empty cell at distance 2: ln(1 / 2)
        assert!((grid[[0, 2]] - 0.5f64.ln()).abs() < 1e-12);
        assert!(grid.iter().all(|v| (-2.0..=2.0).contains(v)));
    }

    #[rstest]
    fn test_oe_region_outside_matrix_is_zero(map: SparseContactMap) {
        let expected = ExpectedValues::new(5000, Normalization::None, vec![100.0]);
        let grid = map
            .oe_region(&BinRect::new(3, 3, 6, 6), Normalization::None, &expected, 2.0)
            .unwrap();
        assert_eq!(grid[[2, 2]], 0.0);
        assert!(grid[[0, 0]] < 0.0);
    }

    #[rstest]
    fn test_normalized_records(map: SparseContactMap) {
        let total: f64 = map
            .normalized_records(Normalization::None)
            .map(|(_, _, v)| v)
            .sum();
        assert_eq!(total, 18.0);
        assert_eq!(map.nnz(), 3);
    }
}
