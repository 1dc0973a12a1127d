use std::fmt::{self, Display};

use crate::consts::WHOLE_GENOME_NAME;

///
/// A chromosome as enumerated by the contact matrix store.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Chromosome {
    pub index: u32,
    pub name: String,
    /// Length in base pairs
    pub length: u64,
}

impl Chromosome {
    pub fn new(index: u32, name: impl Into<String>, length: u64) -> Self {
        Self {
            index,
            name: name.into(),
            length,
        }
    }

    ///
    /// Number of whole bins that fit in the chromosome at `resolution` bp per bin.
    ///
    pub fn bin_count(&self, resolution: u32) -> i64 {
        if resolution == 0 {
            return 0;
        }
        (self.length / u64::from(resolution)) as i64
    }

    /// Whether this is the whole-genome pseudo entry rather than a real chromosome.
    pub fn is_whole_genome(&self) -> bool {
        self.name.eq_ignore_ascii_case(WHOLE_GENOME_NAME)
    }
}

impl Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bp)", self.name, self.length)
    }
}
