//! Directory layout: one record file per job.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::reader::ParquetCursor;
use crate::{RecordStore, RowCursor, schema};

/// Directory of `*.parquet` record files
///
/// File names are expected to sort like the job ids they hold
/// (e.g. `job-001.parquet`, `job-002.parquet`).
#[derive(Debug, Clone)]
pub struct ParquetDirStore {
    dir: PathBuf,
}

impl ParquetDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, name: &str) -> Result<PathBuf> {
        // Names come from callers; never let them leave the directory
        let plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if !plain {
            return Err(StoreError::NotFound(self.dir.join(name)));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl RecordStore for ParquetDirStore {
    async fn list_names(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::from_io(&self.dir, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::from_io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != schema::EXTENSION) {
                continue;
            }

            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::from_io(&path, e))?;
            if !file_type.is_file() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            } else {
                tracing::warn!(path = %path.display(), "Skipping record file with non UTF-8 name");
            }
        }

        names.sort();
        Ok(names)
    }

    async fn open(&self, name: &str) -> Result<Box<dyn RowCursor>> {
        let path = self.path_of(name)?;
        let cursor = ParquetCursor::open(&path, name).await?;
        Ok(Box::new(cursor))
    }
}
