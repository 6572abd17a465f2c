//! Error types for the record store

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when reading or writing job records
#[derive(Debug, Error)]
pub enum StoreError {
    /// File or directory does not exist
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but does not hold readable job records
    #[error("Corrupt record file {name}: {reason}")]
    CorruptFile {
        /// File name within the store
        name: String,
        /// What could not be decoded
        reason: String,
    },

    /// Records could not be turned into a columnar batch
    #[error("Failed to encode records: {0}")]
    Encoding(String),

    /// Any other I/O failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn corrupt(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptFile {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Map an I/O error on `path`, keeping missing files distinguishable
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
