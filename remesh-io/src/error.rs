//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while reading or writing mesh files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Write error: {message}")]
    WriteError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for remesh_core::Error {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => remesh_core::Error::Io(e),
            IoError::FileNotFound { path } => remesh_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path),
            )),
            other => remesh_core::Error::InvalidData(other.to_string()),
        }
    }
}
