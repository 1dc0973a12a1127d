use thiserror::Error;

/// Error type for building an in-memory contact store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Chromosome index {0} is not registered with the store")]
    UnknownChromosome(u32),

    #[error("Chromosome index {0} is already registered with the store")]
    DuplicateChromosome(u32),

    #[error("Chromosome name {0:?} is already registered with the store")]
    DuplicateChromosomeName(String),

    #[error("Resolution must be a positive number of base pairs")]
    ZeroResolution,

    #[error("Bin {bin} is outside chromosome {chrom} ({n_bins} bins at {resolution} bp)")]
    BinOutOfRange {
        chrom: String,
        bin: u64,
        n_bins: u64,
        resolution: u32,
    },

    #[error("Contact counts must be finite and non-negative, got {0}")]
    InvalidCount(f64),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
