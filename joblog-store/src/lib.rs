//! Joblog Record Store
//!
//! Read access to persisted job records, plus the writer used at ingestion.
//!
//! A store exposes a sorted list of names and opens each one as a cursor of
//! [`JobRecord`]s. Two layouts are provided and are interchangeable for
//! callers:
//! - [`ParquetDirStore`]: a directory holding one Parquet file per job
//! - [`ParquetFileStore`]: a single Parquet file holding many jobs
//!
//! Stores are read-only; records are written once with [`write_records`].

pub mod batch;
mod directory;
pub mod error;
mod file;
mod reader;
pub mod schema;
#[cfg(test)]
mod testing;
mod writer;

pub use directory::ParquetDirStore;
pub use error::{Result, StoreError};
pub use file::ParquetFileStore;
pub use reader::ParquetCursor;
pub use writer::write_records;

use async_trait::async_trait;
use joblog_core::domain::job::JobRecord;

/// Sequential read handle over the records of one stored file
///
/// Dropping the cursor closes it.
pub trait RowCursor: Send {
    /// Returns the next record, or `None` once every row has been read
    fn next_record(&mut self) -> Result<Option<JobRecord>>;
}

/// Persisted collection of job records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Names of every record file, sorted ascending
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Opens the named file for reading
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when the file is missing,
    /// [`StoreError::CorruptFile`] when it is not a readable record file.
    async fn open(&self, name: &str) -> Result<Box<dyn RowCursor>>;
}
