//! Labeled stripe training windows from genome contact matrices.
//!
//! Each member crate is re-exported behind a cargo feature of the same name:
//!
//! | feature | crate |
//! |---|---|
//! | `core` | models, `ScanConfig` and collaborator traits |
//! | `overlaprs` | interval search and the 2D feature index |
//! | `store` | in-memory contact matrix store |
//! | `windows` | the diagonal band scanner and batch writer |
//!
//! `full` turns on all of them.
#[cfg(feature = "core")]
#[doc(inline)]
pub use hicstripe_core as core;

#[cfg(feature = "overlaprs")]
#[doc(inline)]
pub use hicstripe_overlaprs as overlaprs;

#[cfg(feature = "store")]
#[doc(inline)]
pub use hicstripe_store as store;

#[cfg(feature = "windows")]
#[doc(inline)]
pub use hicstripe_windows as windows;
