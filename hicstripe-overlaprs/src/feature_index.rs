use fxhash::FxHashMap as HashMap;

use hicstripe_core::models::{BpRect, Feature2D, Interval};
use hicstripe_core::traits::SpatialFeatureIndex;

use crate::Bits;

///
/// Spatial index of 2D features, keyed by chromosome pair.
///
/// Each chromosome pair indexes its features' row intervals (`start1..end1`) in a [`Bits`]
/// list whose payload is the feature's position in `features`. Column intervals are checked
/// on the hits.
///
pub struct FeatureIndex {
    features: Vec<Feature2D>,
    index_maps: HashMap<(u32, u32), Bits<u64, usize>>,
}

impl FeatureIndex {
    pub fn build(features: Vec<Feature2D>) -> Self {
        // STEP 1: organize row intervals by chromosome pair
        let mut intervals: HashMap<(u32, u32), Vec<Interval<u64, usize>>> = HashMap::default();
        for (i, feature) in features.iter().enumerate() {
            intervals
                .entry((feature.chr1, feature.chr2))
                .or_default()
                .push(Interval {
                    start: feature.start1,
                    end: feature.end1,
                    val: i,
                });
        }

        // STEP 2: build one search list per pair
        let index_maps = intervals
            .into_iter()
            .map(|(pair, pair_intervals)| (pair, Bits::build(pair_intervals)))
            .collect();

        FeatureIndex {
            features,
            index_maps,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl SpatialFeatureIndex for FeatureIndex {
    fn contained_features(&self, chr1: u32, chr2: u32, rect: &BpRect) -> Vec<Feature2D> {
        let Some(bits) = self.index_maps.get(&(chr1, chr2)) else {
            return Vec::new();
        };
        if rect.x1 <= 0 || rect.y1 <= 0 || rect.x1 <= rect.x0 || rect.y1 <= rect.y0 {
            return Vec::new();
        }

        let row_start = rect.x0.max(0) as u64;
        let row_end = rect.x1 as u64;

        bits.find_iter(row_start, row_end)
            .map(|iv| &self.features[iv.val])
            .filter(|f| rect.intersects(f.start1, f.end1, f.start2, f.end2))
            .cloned()
            .collect()
    }
}

impl From<Vec<Feature2D>> for FeatureIndex {
    fn from(features: Vec<Feature2D>) -> Self {
        FeatureIndex::build(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn index() -> FeatureIndex {
        FeatureIndex::build(vec![
            // horizontal stripe near the start of chr1
            Feature2D::new(1, 100_000, 110_000, 100_000, 300_000),
            // vertical stripe further along chr1
            Feature2D::new(1, 500_000, 700_000, 690_000, 700_000),
            // same coordinates, other chromosome
            Feature2D::new(2, 100_000, 110_000, 100_000, 300_000),
        ])
    }

    fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> BpRect {
        BpRect { x0, y0, x1, y1 }
    }

    #[rstest]
    fn test_query_hits_only_same_chromosome(index: FeatureIndex) {
        let hits = index.contained_features(1, 1, &rect(50_000, 50_000, 150_000, 150_000));
        assert_eq!(
            hits,
            vec![Feature2D::new(1, 100_000, 110_000, 100_000, 300_000)]
        );

        let hits = index.contained_features(2, 2, &rect(50_000, 50_000, 150_000, 150_000));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chr1, 2);
    }

    #[rstest]
    fn test_row_overlap_without_column_overlap_is_rejected(index: FeatureIndex) {
        // rows overlap the vertical stripe, columns stop short of it
        let hits = index.contained_features(1, 1, &rect(550_000, 500_000, 600_000, 600_000));
        assert!(hits.is_empty());

        let hits = index.contained_features(1, 1, &rect(550_000, 650_000, 600_000, 695_000));
        assert_eq!(hits.len(), 1);
    }

    #[rstest]
    fn test_negative_and_empty_rects(index: FeatureIndex) {
        assert!(
            index
                .contained_features(1, 1, &rect(-500, -500, 0, 0))
                .is_empty()
        );
        // a window reaching past the top edge still finds features inside the map
        let hits = index.contained_features(1, 1, &rect(-100_000, 90_000, 105_000, 120_000));
        assert_eq!(hits.len(), 1);
    }

    #[rstest]
    fn test_unknown_pair(index: FeatureIndex) {
        assert!(
            index
                .contained_features(1, 2, &rect(0, 0, 1_000_000, 1_000_000))
                .is_empty()
        );
        assert_eq!(index.len(), 3);
    }
}
