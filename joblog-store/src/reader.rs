//! Parquet reading.
//!
//! Files are read fully into memory and decoded one record batch at a time.

use std::path::Path;

use bytes::Bytes;
use joblog_core::domain::job::JobRecord;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};

use crate::batch::decode_batch;
use crate::error::{Result, StoreError};
use crate::RowCursor;

/// Cursor over the rows of one Parquet file
pub struct ParquetCursor {
    name: String,
    batches: ParquetRecordBatchReader,
    pending: std::vec::IntoIter<JobRecord>,
}

impl ParquetCursor {
    /// Read the file at `path`; `name` identifies it in errors
    pub async fn open(path: &Path, name: impl Into<String>) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::from_io(path, e))?;

        Self::from_bytes(name, Bytes::from(data))
    }

    /// Parse Parquet content already held in memory
    pub fn from_bytes(name: impl Into<String>, bytes: Bytes) -> Result<Self> {
        let name = name.into();

        // Bytes implements ChunkReader directly
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)
            .map_err(|e| StoreError::corrupt(&name, e))?;

        tracing::trace!(
            file = %name,
            row_groups = builder.metadata().num_row_groups(),
            "Opened record file"
        );

        let batches = builder
            .build()
            .map_err(|e| StoreError::corrupt(&name, e))?;

        Ok(Self {
            name,
            batches,
            pending: Vec::new().into_iter(),
        })
    }
}

impl RowCursor for ParquetCursor {
    fn next_record(&mut self) -> Result<Option<JobRecord>> {
        loop {
            if let Some(record) = self.pending.next() {
                return Ok(Some(record));
            }

            match self.batches.next() {
                Some(batch) => {
                    let batch = batch.map_err(|e| StoreError::corrupt(&self.name, e))?;
                    self.pending = decode_batch(&self.name, &batch)?.into_iter();
                }
                None => return Ok(None),
            }
        }
    }
}
