//! Core infrastructure shared by the hicstripe crates.
//!
//! This crate holds the plain data models used while scanning a contact matrix for stripe
//! windows ([`Chromosome`], [`Feature2D`], [`BinRect`], ...), the [`ScanConfig`] that drives a
//! scan, and the traits through which the scanner talks to its collaborators: the contact
//! matrix store, the value source behind it, and the spatial feature index.
//!
//! Concrete collaborators live in `hicstripe-store` and `hicstripe-overlaprs`; the scanning
//! engine itself lives in `hicstripe-windows`.
//!
//! ## Example
//!
//! ```rust
//! use hicstripe_core::{ScanConfig, Normalization};
//!
//! let config = ScanConfig::new(50, 50)
//!     .with_resolutions([5000, 10000])
//!     .with_offset_from_diagonal(10)
//!     .with_stride(5)
//!     .with_normalization(Normalization::VcSqrt);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.is_square());
//! ```
pub mod config;
pub mod consts;
pub mod errors;
pub mod models;
pub mod traits;

// re-exports
pub use self::config::{EnrichmentThreshold, ScanConfig};
pub use self::errors::{ConfigError, SourceError};
pub use self::models::{
    BinRect, BpRect, Chromosome, ExpectedValues, Feature2D, Interval, Normalization, Zoom,
};
pub use self::traits::{ContactMatrix, ContactMatrixStore, SpatialFeatureIndex, ZoomData};
