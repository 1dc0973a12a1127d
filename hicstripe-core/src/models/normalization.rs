use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalization applied to observed contact counts.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw counts
    #[default]
    None,
    /// Vanilla coverage
    Vc,
    /// Square root of vanilla coverage
    VcSqrt,
}

impl FromStr for Normalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Normalization::None),
            "vc" => Ok(Normalization::Vc),
            "vc_sqrt" => Ok(Normalization::VcSqrt),
            _ => Err(format!("Unknown normalization: {}", s)),
        }
    }
}

impl Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Normalization::None => "NONE",
            Normalization::Vc => "VC",
            Normalization::VcSqrt => "VC_SQRT",
        };
        write!(f, "{}", name)
    }
}

///
/// A zoom level of the contact matrix store, identified by its bin size in base pairs.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zoom {
    pub resolution: u32,
}

impl Zoom {
    pub fn new(resolution: u32) -> Self {
        Self { resolution }
    }
}

impl Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BP_{}", self.resolution)
    }
}
