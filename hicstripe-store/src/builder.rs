use std::collections::BTreeSet;

use fxhash::FxHashMap as HashMap;
use log::debug;

use hicstripe_core::models::{Chromosome, ExpectedValues, Normalization, Zoom};

use crate::errors::{Result, StoreError};
use crate::expected::distance_expected;
use crate::sparse::SparseContactMap;
use crate::store::{ChromosomeMatrix, InMemoryContactStore};

const NORMALIZATIONS: [Normalization; 3] =
    [Normalization::None, Normalization::Vc, Normalization::VcSqrt];

type Counts = HashMap<(u64, u64), f64>;

///
/// Collects chromosomes and contacts, then freezes them into an [`InMemoryContactStore`].
///
/// Repeated contacts between the same pair of bins are summed. By default the distance
/// expected baseline is derived for every loaded resolution and normalization; explicit
/// baselines given with [`ContactStoreBuilder::with_expected`] take precedence.
///
#[derive(Debug)]
pub struct ContactStoreBuilder {
    chromosomes: Vec<Chromosome>,
    counts: HashMap<u32, HashMap<u32, Counts>>,
    expected: HashMap<(u32, Normalization), ExpectedValues>,
    compute_expected: bool,
}

impl Default for ContactStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStoreBuilder {
    pub fn new() -> Self {
        ContactStoreBuilder {
            chromosomes: vec![],
            counts: HashMap::default(),
            expected: HashMap::default(),
            compute_expected: true,
        }
    }

    pub fn add_chromosome(&mut self, chrom: Chromosome) -> Result<&mut Self> {
        if self.chromosomes.iter().any(|c| c.index == chrom.index) {
            return Err(StoreError::DuplicateChromosome(chrom.index));
        }
        if self.chromosomes.iter().any(|c| c.name == chrom.name) {
            return Err(StoreError::DuplicateChromosomeName(chrom.name));
        }
        self.chromosomes.push(chrom);
        Ok(self)
    }

    ///
    /// Register `resolution` for a chromosome without adding contacts, leaving an empty map.
    ///
    pub fn add_resolution(&mut self, chrom_index: u32, resolution: u32) -> Result<&mut Self> {
        if resolution == 0 {
            return Err(StoreError::ZeroResolution);
        }
        self.chromosome(chrom_index)?;
        self.counts
            .entry(chrom_index)
            .or_default()
            .entry(resolution)
            .or_default();
        Ok(self)
    }

    ///
    /// Add `count` contacts between bins `bin1` and `bin2` of a chromosome at `resolution`.
    ///
    pub fn add_contact(
        &mut self,
        chrom_index: u32,
        resolution: u32,
        bin1: u64,
        bin2: u64,
        count: f64,
    ) -> Result<&mut Self> {
        if resolution == 0 {
            return Err(StoreError::ZeroResolution);
        }
        if !count.is_finite() || count < 0.0 {
            return Err(StoreError::InvalidCount(count));
        }

        let chrom = self.chromosome(chrom_index)?;
        let n_bins = n_bins(chrom.length, resolution);
        if let Some(bin) = [bin1, bin2].into_iter().find(|b| *b >= n_bins) {
            return Err(StoreError::BinOutOfRange {
                chrom: chrom.name.clone(),
                bin,
                n_bins,
                resolution,
            });
        }

        let key = (bin1.min(bin2), bin1.max(bin2));
        *self
            .counts
            .entry(chrom_index)
            .or_default()
            .entry(resolution)
            .or_default()
            .entry(key)
            .or_insert(0.0) += count;
        Ok(self)
    }

    /// Add many `(chrom_index, resolution, bin1, bin2, count)` contacts, stopping at the first
    /// error.
    pub fn add_contacts(
        &mut self,
        contacts: impl IntoIterator<Item = (u32, u32, u64, u64, f64)>,
    ) -> Result<&mut Self> {
        for (chrom_index, resolution, bin1, bin2, count) in contacts {
            self.add_contact(chrom_index, resolution, bin1, bin2, count)?;
        }
        Ok(self)
    }

    pub fn with_expected(&mut self, expected: ExpectedValues) -> &mut Self {
        self.expected
            .insert((expected.resolution, expected.normalization), expected);
        self
    }

    /// Whether [`ContactStoreBuilder::build`] derives distance expected baselines.
    pub fn compute_expected(&mut self, enabled: bool) -> &mut Self {
        self.compute_expected = enabled;
        self
    }

    pub fn build(self) -> InMemoryContactStore {
        let mut matrices: HashMap<u32, ChromosomeMatrix> = HashMap::default();
        let mut zooms: BTreeSet<u32> = BTreeSet::new();

        for chrom in self.chromosomes.iter() {
            let Some(per_res) = self.counts.get(&chrom.index) else {
                continue;
            };
            let mut maps = HashMap::default();
            for (&resolution, counts) in per_res.iter() {
                let map = SparseContactMap::new(
                    Zoom::new(resolution),
                    n_bins(chrom.length, resolution),
                    counts.clone(),
                );
                debug!(
                    "Loaded {} contacts for chromosome {} at {} bp",
                    map.nnz(),
                    chrom.name,
                    resolution
                );
                maps.insert(resolution, map);
                zooms.insert(resolution);
            }
            matrices.insert(
                chrom.index,
                ChromosomeMatrix {
                    chromosome: chrom.clone(),
                    zooms: maps,
                },
            );
        }

        let mut expected = HashMap::default();
        if self.compute_expected {
            for &resolution in zooms.iter() {
                for norm in NORMALIZATIONS {
                    let maps = matrices
                        .values()
                        .filter(|m| !m.chromosome.is_whole_genome())
                        .filter_map(|m| m.map(resolution));
                    if let Some(ev) = distance_expected(resolution, norm, maps) {
                        debug!(
                            "Computed {} expected values for {} at {} bp",
                            ev.values.len(),
                            norm,
                            resolution
                        );
                        expected.insert((resolution, norm), ev);
                    }
                }
            }
        }
        expected.extend(self.expected);

        InMemoryContactStore {
            chromosomes: self.chromosomes,
            matrices,
            zooms,
            expected,
        }
    }

    fn chromosome(&self, chrom_index: u32) -> Result<&Chromosome> {
        self.chromosomes
            .iter()
            .find(|c| c.index == chrom_index)
            .ok_or(StoreError::UnknownChromosome(chrom_index))
    }
}

/// Number of bins covering `length` bp, counting a trailing partial bin.
fn n_bins(length: u64, resolution: u32) -> u64 {
    length.div_ceil(u64::from(resolution))
}

#[cfg(test)]
mod tests {
    use super::*;

    use hicstripe_core::models::BinRect;
    use hicstripe_core::traits::{ContactMatrix, ContactMatrixStore, ZoomData};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn builder() -> ContactStoreBuilder {
        let mut builder = ContactStoreBuilder::new();
        builder
            .add_chromosome(Chromosome::new(0, "All", 100_000))
            .unwrap()
            .add_chromosome(Chromosome::new(1, "1", 52_000))
            .unwrap()
            .add_chromosome(Chromosome::new(2, "2", 30_000))
            .unwrap();
        builder
    }

    #[rstest]
    fn test_duplicate_and_unknown_chromosomes(mut builder: ContactStoreBuilder) {
        assert!(matches!(
            builder.add_chromosome(Chromosome::new(1, "chr1", 10)),
            Err(StoreError::DuplicateChromosome(1))
        ));
        // same name under a new index would share a task folder
        assert!(matches!(
            builder.add_chromosome(Chromosome::new(9, "2", 30_000)),
            Err(StoreError::DuplicateChromosomeName(name)) if name == "2"
        ));
        assert_eq!(builder.chromosomes.len(), 3);
        assert!(matches!(
            builder.add_contact(7, 5000, 0, 0, 1.0),
            Err(StoreError::UnknownChromosome(7))
        ));
    }

    #[rstest]
    #[case(0, 0, 1.0)]
    #[case(5000, 11, 1.0)]
    #[case(5000, 0, -1.0)]
    #[case(5000, 0, f64::NAN)]
    fn test_rejected_contacts(
        mut builder: ContactStoreBuilder,
        #[case] resolution: u32,
        #[case] bin: u64,
        #[case] count: f64,
    ) {
        assert!(builder.add_contact(1, resolution, 0, bin, count).is_err());
    }

    #[rstest]
    fn test_last_partial_bin_is_addressable(mut builder: ContactStoreBuilder) {
        // 52 kb at 5 kb is 11 bins, the last one partial
        assert!(builder.add_contact(1, 5000, 10, 10, 1.0).is_ok());
    }

    #[rstest]
    fn test_contacts_accumulate_symmetrically(mut builder: ContactStoreBuilder) {
        builder
            .add_contacts([(1, 5000, 3, 1, 2.0), (1, 5000, 1, 3, 1.5)])
            .unwrap();
        let store = builder.build();

        let chrom = Chromosome::new(1, "1", 52_000);
        let zoom = store.zoom_for_resolution(5000).unwrap();
        let zd = store.matrix(&chrom).unwrap().zoom_data(&zoom).unwrap();
        let grid = zd
            .raw_region(&BinRect::new(0, 0, 5, 5), Normalization::None)
            .unwrap();
        assert_eq!(grid[[1, 3]], 3.5);
        assert_eq!(grid[[3, 1]], 3.5);
    }

    #[rstest]
    fn test_build_lookups(mut builder: ContactStoreBuilder) {
        builder
            .add_contact(1, 5000, 0, 0, 1.0)
            .unwrap()
            .add_resolution(2, 10000)
            .unwrap();
        let store = builder.build();

        assert_eq!(store.chromosomes().len(), 3);
        assert_eq!(
            store.resolutions().iter().copied().collect::<Vec<_>>(),
            vec![5000, 10000]
        );
        assert!(store.zoom_for_resolution(2500).is_none());

        let all = Chromosome::new(0, "All", 100_000);
        assert!(store.matrix(&all).is_none());

        let chr2 = Chromosome::new(2, "2", 30_000);
        let m = store.matrix(&chr2).unwrap();
        assert!(m.zoom_data(&Zoom::new(5000)).is_none());
        assert!(m.zoom_data(&Zoom::new(10000)).is_some());
    }

    #[rstest]
    fn test_expected_computed_for_every_normalization(mut builder: ContactStoreBuilder) {
        builder.add_contact(1, 5000, 0, 2, 4.0).unwrap();
        let store = builder.build();
        let zoom = Zoom::new(5000);

        for norm in NORMALIZATIONS {
            assert!(store.expected_values(&zoom, norm).is_some());
        }
        let ev = store.expected_values(&zoom, Normalization::None).unwrap();
        // 11 bins, 9 cells at distance 2
        assert!((ev.values[2] - 4.0 / 9.0).abs() < 1e-12);
    }

    #[rstest]
    fn test_expected_disabled_and_overridden(mut builder: ContactStoreBuilder) {
        builder
            .add_contact(1, 5000, 0, 2, 4.0)
            .unwrap()
            .compute_expected(false)
            .with_expected(ExpectedValues::new(5000, Normalization::Vc, vec![1.0, 0.5]));
        let store = builder.build();
        let zoom = Zoom::new(5000);

        assert!(store.expected_values(&zoom, Normalization::None).is_none());
        assert_eq!(
            store.expected_values(&zoom, Normalization::Vc).unwrap().values,
            vec![1.0, 0.5]
        );
    }
}
