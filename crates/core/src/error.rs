//! Error types for grid access and configuration loading.
//!
//! Rejected moves and game over are not errors: the session reports them
//! through return values and its state.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Contract violation on the grid: a coordinate outside `[0, columns) x [0, rows)`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {columns}x{rows} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        columns: u16,
        rows: u16,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
