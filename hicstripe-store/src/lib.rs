//! # In-memory contact matrix store
//!
//! A reference implementation of the collaborators the stripe scanner reads from: the contact
//! matrix store ([`hicstripe_core::ContactMatrixStore`]) and its per-zoom value source
//! ([`hicstripe_core::ZoomData`]).
//!
//! Contacts are held sparsely, one upper-triangle map per chromosome and resolution. Coverage
//! normalization vectors and the distance-expected baselines are derived once at
//! [`ContactStoreBuilder::build`] time, so the finished store is immutable and can be shared by
//! any number of scan threads.
//!
//! ```rust
//! use hicstripe_core::{
//!     BinRect, Chromosome, ContactMatrix, ContactMatrixStore, Normalization, ZoomData,
//! };
//! use hicstripe_store::ContactStoreBuilder;
//!
//! let mut builder = ContactStoreBuilder::new();
//! builder.add_chromosome(Chromosome::new(1, "1", 50_000)).unwrap();
//! builder.add_contact(1, 5000, 2, 4, 7.0).unwrap();
//! let store = builder.build();
//!
//! let chrom = &store.chromosomes()[0];
//! let zoom = store.zoom_for_resolution(5000).unwrap();
//! let zd = store.matrix(chrom).unwrap().zoom_data(&zoom).unwrap();
//!
//! let grid = zd.raw_region(&BinRect::new(0, 0, 10, 10), Normalization::None).unwrap();
//! assert_eq!(grid[[2, 4]], 7.0);
//! assert_eq!(grid[[4, 2]], 7.0);
//! ```
pub mod builder;
pub mod errors;
pub mod expected;
pub mod normalization;
pub mod sparse;
pub mod store;

// re-exports
pub use builder::ContactStoreBuilder;
pub use errors::*;
pub use sparse::SparseContactMap;
pub use store::{ChromosomeMatrix, InMemoryContactStore};
