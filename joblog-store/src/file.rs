//! Single-file layout: every job in one record file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::reader::ParquetCursor;
use crate::{RecordStore, RowCursor};

/// One Parquet file holding many job records, in id order
#[derive(Debug, Clone)]
pub struct ParquetFileStore {
    path: PathBuf,
    name: String,
}

impl ParquetFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for ParquetFileStore {
    async fn list_names(&self) -> Result<Vec<String>> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| StoreError::from_io(&self.path, e))?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound(self.path.clone()));
        }

        Ok(vec![self.name.clone()])
    }

    async fn open(&self, name: &str) -> Result<Box<dyn RowCursor>> {
        if name != self.name {
            return Err(StoreError::NotFound(PathBuf::from(name)));
        }

        let cursor = ParquetCursor::open(&self.path, name).await?;
        Ok(Box::new(cursor))
    }
}
