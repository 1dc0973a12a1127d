use std::io;

use thiserror::Error;

use hicstripe_core::errors::SourceError;

/// Error type for the window scanning engine.
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Extracted grid is {actual_rows}x{actual_cols}, expected {rows}x{cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Config(#[from] hicstripe_core::errors::ConfigError),
}

/// Result type alias for window operations.
pub type Result<T> = std::result::Result<T, WindowError>;
