use std::fmt::{self, Display};

///
/// An annotated rectangle of the contact map, e.g. a called stripe.
///
/// The first interval runs along the rows of the map, the second along the columns.
/// Coordinates are in base pairs, start inclusive and end exclusive.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Feature2D {
    pub chr1: u32,
    pub start1: u64,
    pub end1: u64,
    pub chr2: u32,
    pub start2: u64,
    pub end2: u64,
}

impl Feature2D {
    /// An intra-chromosomal feature.
    pub fn new(chrom_index: u32, start1: u64, end1: u64, start2: u64, end2: u64) -> Self {
        Self {
            chr1: chrom_index,
            start1,
            end1,
            chr2: chrom_index,
            start2,
            end2,
        }
    }

    ///
    /// Footprint height in bins at `resolution`. Never less than one bin.
    ///
    pub fn row_length(&self, resolution: u32) -> i64 {
        span_in_bins(self.start1, self.end1, resolution)
    }

    ///
    /// Footprint width in bins at `resolution`. Never less than one bin.
    ///
    pub fn col_length(&self, resolution: u32) -> i64 {
        span_in_bins(self.start2, self.end2, resolution)
    }

    /// First row bin of the footprint.
    pub fn start_row_bin(&self, resolution: u32) -> i64 {
        (self.start1 / u64::from(resolution.max(1))) as i64
    }

    /// First column bin of the footprint.
    pub fn start_col_bin(&self, resolution: u32) -> i64 {
        (self.start2 / u64::from(resolution.max(1))) as i64
    }
}

fn span_in_bins(start: u64, end: u64, resolution: u32) -> i64 {
    let width = end.saturating_sub(start);
    ((width / u64::from(resolution.max(1))) as i64).max(1)
}

impl Display for Feature2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{} x {}:{}-{}",
            self.chr1, self.start1, self.end1, self.chr2, self.start2, self.end2
        )
    }
}
