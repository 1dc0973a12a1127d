use std::collections::BTreeSet;

use fxhash::FxHashMap as HashMap;

use hicstripe_core::models::{Chromosome, ExpectedValues, Normalization, Zoom};
use hicstripe_core::traits::{ContactMatrix, ContactMatrixStore, ZoomData};

use crate::sparse::SparseContactMap;

///
/// The intra-chromosomal matrix of one chromosome at every resolution it was loaded at.
///
#[derive(Debug, Clone)]
pub struct ChromosomeMatrix {
    pub chromosome: Chromosome,
    pub(crate) zooms: HashMap<u32, SparseContactMap>,
}

impl ChromosomeMatrix {
    pub fn resolutions(&self) -> BTreeSet<u32> {
        self.zooms.keys().copied().collect()
    }

    pub fn map(&self, resolution: u32) -> Option<&SparseContactMap> {
        self.zooms.get(&resolution)
    }
}

impl ContactMatrix for ChromosomeMatrix {
    fn zoom_data(&self, zoom: &Zoom) -> Option<&dyn ZoomData> {
        self.zooms
            .get(&zoom.resolution)
            .map(|m| m as &dyn ZoomData)
    }
}

///
/// Immutable in-memory contact store. Build one with [`crate::ContactStoreBuilder`].
///
#[derive(Debug, Clone)]
pub struct InMemoryContactStore {
    pub(crate) chromosomes: Vec<Chromosome>,
    pub(crate) matrices: HashMap<u32, ChromosomeMatrix>,
    pub(crate) zooms: BTreeSet<u32>,
    pub(crate) expected: HashMap<(u32, Normalization), ExpectedValues>,
}

impl InMemoryContactStore {
    /// Resolutions that at least one chromosome has contacts at.
    pub fn resolutions(&self) -> &BTreeSet<u32> {
        &self.zooms
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }
}

impl ContactMatrixStore for InMemoryContactStore {
    fn chromosomes(&self) -> Vec<Chromosome> {
        self.chromosomes.clone()
    }

    fn matrix(&self, chrom: &Chromosome) -> Option<&dyn ContactMatrix> {
        self.matrices
            .get(&chrom.index)
            .map(|m| m as &dyn ContactMatrix)
    }

    fn zoom_for_resolution(&self, resolution: u32) -> Option<Zoom> {
        self.zooms
            .contains(&resolution)
            .then(|| Zoom::new(resolution))
    }

    fn expected_values(&self, zoom: &Zoom, norm: Normalization) -> Option<&ExpectedValues> {
        self.expected.get(&(zoom.resolution, norm))
    }
}
