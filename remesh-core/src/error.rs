//! Error types for remesh

use thiserror::Error;

/// Main error type for remesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for remesh operations
pub type Result<T> = std::result::Result<T, Error>;
