//! Server configuration
//!
//! Where the job records live, how they are laid out, and how long a
//! listing may take.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use joblog_store::{ParquetDirStore, ParquetFileStore, RecordStore};

/// How job records are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLayout {
    /// A directory with one Parquet file per job
    Directory,
    /// A single Parquet file holding every job
    File,
}

impl FromStr for StoreLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directory" | "dir" => Ok(StoreLayout::Directory),
            "file" => Ok(StoreLayout::File),
            other => anyhow::bail!("unknown store layout '{}' (expected directory or file)", other),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub bind_addr: String,

    /// Logs directory, or the logs file for the `File` layout
    pub logs_path: PathBuf,

    pub layout: StoreLayout,

    /// Upper bound on one listing; `None` disables the deadline
    pub read_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(logs_path: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            logs_path: logs_path.into(),
            layout: StoreLayout::Directory,
            read_timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JOBLOG_BIND_ADDR (optional, default: 0.0.0.0:3000)
    /// - JOBLOG_LOGS_PATH (optional, default: logs)
    /// - JOBLOG_STORE_LAYOUT (optional, directory | file, default: directory)
    /// - JOBLOG_READ_TIMEOUT (optional, seconds, 0 disables, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("JOBLOG_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Ok(path) = std::env::var("JOBLOG_LOGS_PATH") {
            config.logs_path = PathBuf::from(path);
        }

        if let Ok(layout) = std::env::var("JOBLOG_STORE_LAYOUT") {
            config.layout = layout.parse()?;
        }

        if let Some(secs) = std::env::var("JOBLOG_READ_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.read_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.logs_path.as_os_str().is_empty() {
            anyhow::bail!("logs_path cannot be empty");
        }

        if self.read_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("read_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Record store for the configured path and layout
    pub fn record_store(&self) -> Arc<dyn RecordStore> {
        match self.layout {
            StoreLayout::Directory => Arc::new(ParquetDirStore::new(&self.logs_path)),
            StoreLayout::File => Arc::new(ParquetFileStore::new(&self.logs_path)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("logs")
    }
}
