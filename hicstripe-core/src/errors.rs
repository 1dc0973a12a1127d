use thiserror::Error;

use crate::models::{BinRect, Zoom};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing or invalid file extension for scan config file. It must be `yaml`, `yml` or `toml`"
    )]
    InvalidFileType,
    #[error("Invalid scan configuration: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Failure raised by a value source while reading a region of a contact matrix.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read region {rect} at {zoom}: {reason}")]
    Region {
        rect: BinRect,
        zoom: Zoom,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
