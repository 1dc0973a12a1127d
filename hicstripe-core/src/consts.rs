/// Name of the whole-genome pseudo chromosome. It never gets a scan task of its own.
pub const WHOLE_GENOME_NAME: &str = "All";

/// Windows written under one set of index files before the batch rolls over.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10_000;

/// Bound applied to log observed/expected values.
pub const DEFAULT_OE_LOG_THRESHOLD: f64 = 2.0;

/// Pseudocount added to both observed and expected values before taking the O/E ratio.
pub const OE_PSEUDOCOUNT: f64 = 1.0;
