//! Parquet writing.

use std::path::Path;

use joblog_core::domain::job::JobRecord;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::batch::encode_batch;
use crate::error::{Result, StoreError};
use crate::schema;

/// Write `records`, in order, as one Parquet file at `path`.
///
/// An existing file at `path` is replaced.
pub async fn write_records(path: &Path, records: &[JobRecord]) -> Result<u64> {
    let buffer = serialize_records(records)?;
    let size_bytes = buffer.len() as u64;

    tokio::fs::write(path, buffer)
        .await
        .map_err(|e| StoreError::from_io(path, e))?;

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        size_bytes,
        "Wrote record file"
    );

    Ok(size_bytes)
}

fn serialize_records(records: &[JobRecord]) -> Result<Vec<u8>> {
    let batch = encode_batch(records)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema::job_schema(), Some(props))
            .map_err(|e| StoreError::Encoding(e.to_string()))?;

        writer
            .write(&batch)
            .map_err(|e| StoreError::Encoding(e.to_string()))?;

        writer
            .close()
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
    }

    Ok(buffer)
}
