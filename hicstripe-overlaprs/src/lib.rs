//! Overlap queries for hicstripe.
//!
//! Two layers live here:
//!
//! - [`Bits`], a Binary Interval Search list answering "which intervals overlap `[start, end)`"
//!   on one axis.
//! - [`FeatureIndex`], the 2D spatial index the stripe scanner queries for annotated features.
//!   It runs a [`Bits`] search along the rows of the contact map and filters the hits on the
//!   column axis.
//!
//! ## Quick Start
//!
//! ```rust
//! use hicstripe_core::{BpRect, Feature2D, SpatialFeatureIndex};
//! use hicstripe_overlaprs::FeatureIndex;
//!
//! let index = FeatureIndex::build(vec![
//!     Feature2D::new(1, 100_000, 110_000, 100_000, 300_000),
//!     Feature2D::new(1, 900_000, 910_000, 900_000, 950_000),
//! ]);
//!
//! let window = BpRect { x0: 50_000, y0: 50_000, x1: 150_000, y1: 150_000 };
//! let hits = index.contained_features(1, 1, &window);
//! assert_eq!(hits.len(), 1);
//! ```

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// 2D feature index over the contact map.
pub mod feature_index;

// re-exports
pub use self::bits::Bits;
pub use self::feature_index::FeatureIndex;
pub use hicstripe_core::models::Interval;
