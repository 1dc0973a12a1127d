use hicstripe_core::models::{ExpectedValues, Normalization};

use crate::sparse::SparseContactMap;

///
/// Distance-expected baseline over every map of one resolution.
///
/// The value at distance `d` is the sum of normalized contacts `d` bins off the diagonal,
/// pooled across all maps, divided by the number of cells at that distance
/// (`n_bins - d` per map). Returns `None` if there is nothing to pool.
///
pub fn distance_expected<'a>(
    resolution: u32,
    norm: Normalization,
    maps: impl IntoIterator<Item = &'a SparseContactMap>,
) -> Option<ExpectedValues> {
    let maps: Vec<&SparseContactMap> = maps.into_iter().collect();
    let max_bins = maps.iter().map(|m| m.n_bins()).max()?;
    if max_bins == 0 {
        return None;
    }

    let mut sums = vec![0.0; max_bins as usize];
    let mut cells = vec![0u64; max_bins as usize];

    for map in maps.iter() {
        let n = map.n_bins();
        for (d, c) in cells.iter_mut().enumerate().take(n as usize) {
            *c += n - d as u64;
        }
        for (i, j, v) in map.normalized_records(norm) {
            sums[(j - i) as usize] += v;
        }
    }

    let values = sums
        .into_iter()
        .zip(cells)
        .map(|(s, c)| if c == 0 { 0.0 } else { s / c as f64 })
        .collect();

    Some(ExpectedValues::new(resolution, norm, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    use fxhash::FxHashMap as HashMap;
    use hicstripe_core::models::Zoom;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn map(n_bins: u64, contacts: &[(u64, u64, f64)]) -> SparseContactMap {
        let mut counts = HashMap::default();
        for &(i, j, v) in contacts {
            counts.insert((i, j), v);
        }
        SparseContactMap::new(Zoom::new(1000), n_bins, counts)
    }

    #[rstest]
    fn test_single_map_expected() {
        let m = map(4, &[(0, 0, 4.0), (1, 1, 4.0), (0, 1, 3.0), (0, 3, 2.0)]);
        let ev = distance_expected(1000, Normalization::None, [&m]).unwrap();

        assert_eq!(ev.values, vec![2.0, 1.0, 0.0, 2.0]);
        assert_eq!(ev.resolution, 1000);
    }

    #[rstest]
    fn test_pooled_across_maps() {
        let a = map(3, &[(0, 0, 3.0)]);
        let b = map(2, &[(1, 1, 7.0), (0, 1, 2.0)]);
        let ev = distance_expected(1000, Normalization::None, [&a, &b]).unwrap();

        // d=0: 10 over 3 + 2 cells, d=1: 2 over 2 + 1 cells, d=2: 0 over 1 cell
        assert_eq!(ev.values.len(), 3);
        assert!((ev.values[0] - 2.0).abs() < 1e-12);
        assert!((ev.values[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(ev.values[2], 0.0);
    }

    #[rstest]
    fn test_no_maps() {
        let maps: Vec<&SparseContactMap> = vec![];
        assert!(distance_expected(1000, Normalization::Vc, maps).is_none());
    }
}
