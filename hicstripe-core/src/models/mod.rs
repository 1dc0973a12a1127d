pub mod chromosome;
pub mod expected;
pub mod feature;
pub mod interval;
pub mod normalization;
pub mod rect;

// re-export for cleaner imports
pub use self::chromosome::Chromosome;
pub use self::expected::ExpectedValues;
pub use self::feature::Feature2D;
pub use self::interval::Interval;
pub use self::normalization::{Normalization, Zoom};
pub use self::rect::{BinRect, BpRect};
