//! Log listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobRecord;

/// Query string of `GET /api/v1/logs`
///
/// Every field is optional; the server applies its defaults for missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Case-insensitive substring of the job id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// `success`, `error` or `all`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// RFC 3339 instant or `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// RFC 3339 instant or `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// One page of job records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    pub page: u32,
    pub page_size: u32,
    /// Number of records matching the filter, across all pages
    pub total_files: u64,
    pub logs: Vec<JobRecord>,
}

impl LogPage {
    /// Number of pages needed to show every matching record
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_files.div_ceil(u64::from(self.page_size))
    }
}
