//! Platform error types

use std::path::PathBuf;

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Reading file metadata failed
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a regular file
    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// Key name not recognized
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
