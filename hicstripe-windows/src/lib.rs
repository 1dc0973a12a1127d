//! # Stripe window extraction
//!
//! Slides a fixed-size window along a band around the diagonal of a contact matrix, labels
//! each window with the annotated stripes it overlaps, and writes window/label pairs into
//! batched positive and negative training sets.
//!
//! One [`ScanTask`] runs per `(resolution, chromosome)` pair and owns everything it writes:
//!
//! ```text
//! <output>/<resolution>_chr<name>/
//!     positive_<batch>/<chrom>_<row>_<col>_<Horzntl|Vertcl>_matrix[.label[.exp]]
//!     negative_<batch>/<chrom>_<row>_<col>_<Horzntl|Vertcl>_matrix
//!     pos_file_names_<batch>.txt
//!     neg_file_names_<batch>.txt
//!     pos_label_file_names_<batch>.txt
//! ```
//!
//! Vertical windows are reflected across the anti-diagonal before they are written, so every
//! persisted grid is `x × y`.
//!
//! ## Example
//!
//! ```rust
//! use hicstripe_core::{BpRect, Chromosome, Feature2D, ScanConfig, SpatialFeatureIndex};
//! use hicstripe_store::ContactStoreBuilder;
//! use hicstripe_windows::{StripeScanner, TaskStatus};
//!
//! struct NoFeatures;
//!
//! impl SpatialFeatureIndex for NoFeatures {
//!     fn contained_features(&self, _: u32, _: u32, _: &BpRect) -> Vec<Feature2D> {
//!         vec![]
//!     }
//! }
//!
//! let mut builder = ContactStoreBuilder::new();
//! builder.add_chromosome(Chromosome::new(1, "1", 100_000)).unwrap();
//! builder.add_contact(1, 5000, 3, 4, 2.0).unwrap();
//! let store = builder.build();
//!
//! let config = ScanConfig::new(5, 5)
//!     .with_resolutions([5000])
//!     .with_offset_from_diagonal(2)
//!     .with_stride(5);
//!
//! let out = tempfile::tempdir().unwrap();
//! let scanner = StripeScanner::new(config, &store, &NoFeatures, out.path()).unwrap();
//! let summaries = scanner.run().unwrap();
//!
//! assert_eq!(summaries[0].status, TaskStatus::Completed);
//! assert!(out.path().join("5000_chr1/negative_0/1_0_0_Horzntl_matrix").is_file());
//! ```
pub mod batch;
pub mod consts;
pub mod errors;
pub mod extract;
pub mod labels;
pub mod orientation;
pub mod scan;
pub mod tasks;

// re-exports
pub use self::batch::{BatchWriter, OutputRecord, RecordKind};
pub use self::errors::{Result, WindowError};
pub use self::extract::{Extraction, SkipReason, WindowExtractor};
pub use self::labels::{FeatureLabeler, LabelGrids};
pub use self::orientation::{Anchor, Orientation, Window, canonical_transform};
pub use self::scan::{BatchCursor, ScanTask, TaskStatus, TaskSummary, scan_anchors};
pub use self::tasks::StripeScanner;
