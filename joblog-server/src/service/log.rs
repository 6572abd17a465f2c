//! Log Service
//!
//! Lists job records from a record store, filtered and paginated.

use std::ops::Range;
use std::time::Duration;

use chrono::{DateTime, Utc};
use joblog_core::domain::job::{JobRecord, JobStatus};
use joblog_store::{RecordStore, RowCursor, StoreError};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Service error type
#[derive(Debug)]
pub enum LogError {
    /// Some record file could not be opened or read
    StoreUnavailable(StoreError),
    DeadlineExceeded(Duration),
    InvalidPageSize(i64),
    /// Decoding worker panicked or was cancelled
    ScanAborted(String),
}

impl From<StoreError> for LogError {
    fn from(err: StoreError) -> Self {
        LogError::StoreUnavailable(err)
    }
}

pub type Result<T> = std::result::Result<T, LogError>;

/// Conjunction of optional record predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Stored lowercased
    id_contains: Option<String>,
    status: Option<JobStatus>,
    start_from: Option<DateTime<Utc>>,
    end_to: Option<DateTime<Utc>>,
}

impl JobFilter {
    /// Case-insensitive substring of the job id; blank means no filter
    pub fn with_id_contains(mut self, needle: &str) -> Self {
        let needle = needle.trim();
        self.id_contains = (!needle.is_empty()).then(|| needle.to_lowercase());
        self
    }

    pub fn with_status(mut self, status: Option<JobStatus>) -> Self {
        self.status = status;
        self
    }

    /// Keep jobs starting at or after `from`
    pub fn with_start_from(mut self, from: Option<DateTime<Utc>>) -> Self {
        self.start_from = from;
        self
    }

    /// Keep jobs ending at or before `to`
    pub fn with_end_to(mut self, to: Option<DateTime<Utc>>) -> Self {
        self.end_to = to;
        self
    }

    pub fn matches(&self, record: &JobRecord) -> bool {
        if let Some(needle) = &self.id_contains {
            if !record.id.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if self.status.is_some_and(|status| status != record.status) {
            return false;
        }

        if self.start_from.is_some_and(|from| record.start_time < from) {
            return false;
        }

        if self.end_to.is_some_and(|to| record.end_time > to) {
            return false;
        }

        true
    }
}

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Pages below 1 are clamped to 1; sizes must be positive.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self> {
        let page = page
            .unwrap_or(i64::from(DEFAULT_PAGE))
            .clamp(1, i64::from(u32::MAX)) as u32;

        let page_size = page_size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
        if page_size <= 0 {
            return Err(LogError::InvalidPageSize(page_size));
        }
        let page_size = page_size.min(i64::from(u32::MAX)) as u32;

        Ok(Self { page, page_size })
    }

    /// Index of the first record on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of matching records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPage {
    pub items: Vec<JobRecord>,
    /// Records passing the filter across all pages
    pub total_matched: u64,
}

/// List the records matching `filter`, restricted to the `page` window
///
/// Records keep store order: file names ascending, then row order. Any read
/// failure aborts the whole listing. With a `deadline`, the listing fails once
/// it has run that long.
pub async fn list_jobs(
    store: &dyn RecordStore,
    filter: &JobFilter,
    page: PageRequest,
    deadline: Option<Duration>,
) -> Result<JobPage> {
    let result = match deadline {
        Some(limit) => tokio::time::timeout(limit, scan(store, filter, page))
            .await
            .map_err(|_| LogError::DeadlineExceeded(limit))?,
        None => scan(store, filter, page).await,
    };

    match &result {
        Ok(listed) => tracing::debug!(
            page = page.page,
            page_size = page.page_size,
            returned = listed.items.len(),
            total_matched = listed.total_matched,
            "Listed job records"
        ),
        Err(err) => tracing::warn!("Job listing failed: {:?}", err),
    }

    result
}

/// Single pass over the store: filter, count and collect the page window
///
/// Each file is decoded on the blocking pool so a deadline can fire while a
/// large file is still being read.
async fn scan(store: &dyn RecordStore, filter: &JobFilter, page: PageRequest) -> Result<JobPage> {
    let names = store.list_names().await?;

    let window = page.offset()..page.offset() + u64::from(page.page_size);
    let mut items = Vec::with_capacity(page.page_size.min(100) as usize);
    let mut total_matched = 0u64;

    for name in &names {
        let cursor = store.open(name).await?;
        let filter = filter.clone();
        let window = window.clone();
        let matched_before = total_matched;

        let (hits, matched) = tokio::task::spawn_blocking(move || {
            scan_file(cursor, &filter, window, matched_before)
        })
        .await
        .map_err(|e| LogError::ScanAborted(format!("scan of {} aborted: {}", name, e)))??;

        items.extend(hits);
        total_matched = matched;
    }

    Ok(JobPage {
        items,
        total_matched,
    })
}

/// Drain one cursor; `matched` is the match count of the files before it
fn scan_file(
    mut cursor: Box<dyn RowCursor>,
    filter: &JobFilter,
    window: Range<u64>,
    mut matched: u64,
) -> joblog_store::Result<(Vec<JobRecord>, u64)> {
    let mut hits = Vec::new();

    while let Some(record) = cursor.next_record()? {
        if !filter.matches(&record) {
            continue;
        }
        if window.contains(&matched) {
            hits.push(record);
        }
        matched += 1;
    }

    Ok((hits, matched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use joblog_core::domain::job::OperatorRecord;
    use std::path::PathBuf;

    /// Named files of records, listed in name order
    struct MemoryStore {
        files: Vec<(String, Vec<JobRecord>)>,
        broken: Option<String>,
        delay: Option<Duration>,
        /// Blocking pause before each row, like a slow decode
        row_delay: Option<Duration>,
    }

    impl MemoryStore {
        /// One record per file, like the directory layout
        fn new(records: Vec<JobRecord>) -> Self {
            Self::with_files(
                records
                    .into_iter()
                    .map(|r| (format!("{}.parquet", r.id), vec![r]))
                    .collect(),
            )
        }

        /// Every record in one file, like the single-file layout
        fn single_file(records: Vec<JobRecord>) -> Self {
            Self::with_files(vec![("logs.parquet".to_string(), records)])
        }

        fn with_files(files: Vec<(String, Vec<JobRecord>)>) -> Self {
            Self {
                files,
                broken: None,
                delay: None,
                row_delay: None,
            }
        }
    }

    struct VecCursor {
        rows: std::vec::IntoIter<JobRecord>,
        row_delay: Option<Duration>,
    }

    impl RowCursor for VecCursor {
        fn next_record(&mut self) -> joblog_store::Result<Option<JobRecord>> {
            if let Some(delay) = self.row_delay {
                std::thread::sleep(delay);
            }
            Ok(self.rows.next())
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn list_names(&self) -> joblog_store::Result<Vec<String>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let mut names: Vec<_> = self.files.iter().map(|(name, _)| name.clone()).collect();
            names.sort();
            Ok(names)
        }

        async fn open(&self, name: &str) -> joblog_store::Result<Box<dyn RowCursor>> {
            if self.broken.as_deref() == Some(name) {
                return Err(StoreError::corrupt(name, "truncated footer"));
            }
            let rows = self
                .files
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, rows)| rows.clone())
                .ok_or_else(|| StoreError::NotFound(PathBuf::from(name)))?;
            Ok(Box::new(VecCursor {
                rows: rows.into_iter(),
                row_delay: self.row_delay,
            }))
        }
    }

    /// job-001..job-010, one hour apart from 08:00, errors on 002, 004 and 007
    fn fixture() -> Vec<JobRecord> {
        (1..=10)
            .map(|i| {
                let start = Utc.with_ymd_and_hms(2025, 2, 25, 7 + i, 0, 0).unwrap();
                let failed = matches!(i, 2 | 4 | 7);
                JobRecord {
                    id: format!("job-{i:03}"),
                    start_time: start,
                    end_time: start + chrono::Duration::minutes(5),
                    duration_seconds: 300,
                    num_executors: 8,
                    status: if failed {
                        JobStatus::Error
                    } else {
                        JobStatus::Success
                    },
                    errors: if failed {
                        vec!["Out of memory".to_string()]
                    } else {
                        Vec::new()
                    },
                    operators: vec![OperatorRecord {
                        operator_id: format!("op-{i}01"),
                        operator_type: "ReadParquet".to_string(),
                        duration_seconds: 50,
                        dependencies: Vec::new(),
                        errors: Vec::new(),
                    }],
                }
            })
            .collect()
    }

    fn ids(page: &JobPage) -> Vec<&str> {
        page.items.iter().map(|r| r.id.as_str()).collect()
    }

    async fn list(store: &MemoryStore, filter: JobFilter, page: i64, size: i64) -> JobPage {
        let request = PageRequest::new(Some(page), Some(size)).unwrap();
        list_jobs(store, &filter, request, None).await.unwrap()
    }

    #[test]
    fn test_page_request_defaults_and_clamping() {
        assert_eq!(PageRequest::new(None, None).unwrap(), PageRequest::default());

        let clamped = PageRequest::new(Some(-3), Some(5)).unwrap();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.offset(), 0);

        assert_eq!(PageRequest::new(Some(3), Some(5)).unwrap().offset(), 10);
    }

    #[test]
    fn test_page_request_rejects_non_positive_size() {
        assert!(matches!(
            PageRequest::new(Some(1), Some(0)),
            Err(LogError::InvalidPageSize(0))
        ));
        assert!(matches!(
            PageRequest::new(Some(1), Some(-10)),
            Err(LogError::InvalidPageSize(-10))
        ));
    }

    #[tokio::test]
    async fn test_pages_are_ordered_slices() {
        let store = MemoryStore::new(fixture());

        let first = list(&store, JobFilter::default(), 1, 4).await;
        assert_eq!(ids(&first), vec!["job-001", "job-002", "job-003", "job-004"]);
        assert_eq!(first.total_matched, 10);

        let last = list(&store, JobFilter::default(), 3, 4).await;
        assert_eq!(ids(&last), vec!["job-009", "job-010"]);
        assert_eq!(last.total_matched, 10);
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty() {
        let store = MemoryStore::new(fixture());

        let page = list(&store, JobFilter::default(), 100, 10).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total_matched, 10);
    }

    #[tokio::test]
    async fn test_id_filter_is_case_insensitive() {
        let store = MemoryStore::new(fixture());

        let all = list(&store, JobFilter::default().with_id_contains("JOB-00"), 1, 20).await;
        assert_eq!(all.total_matched, 9);

        let all = list(&store, JobFilter::default().with_id_contains("job-0"), 1, 20).await;
        assert_eq!(all.total_matched, 10);

        let one = list(&store, JobFilter::default().with_id_contains("B-010"), 1, 20).await;
        assert_eq!(ids(&one), vec!["job-010"]);

        let blank = list(&store, JobFilter::default().with_id_contains("  "), 1, 20).await;
        assert_eq!(blank.total_matched, 10);
    }

    #[tokio::test]
    async fn test_status_filter() {
        let store = MemoryStore::new(fixture());
        let filter = JobFilter::default().with_status(Some(JobStatus::Error));

        let page = list(&store, filter.clone(), 1, 10).await;
        assert_eq!(ids(&page), vec!["job-002", "job-004", "job-007"]);
        assert_eq!(page.total_matched, 3);

        // Total stays the same whatever the window
        let second = list(&store, filter, 2, 2).await;
        assert_eq!(ids(&second), vec!["job-007"]);
        assert_eq!(second.total_matched, 3);
    }

    #[tokio::test]
    async fn test_date_bounds_are_inclusive() {
        let store = MemoryStore::new(fixture());
        let from = Utc.with_ymd_and_hms(2025, 2, 25, 8, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 2, 25, 10, 5, 0).unwrap();

        let filter = JobFilter::default()
            .with_start_from(Some(from))
            .with_end_to(Some(to));
        let page = list(&store, filter, 1, 10).await;

        assert_eq!(ids(&page), vec!["job-001", "job-002", "job-003"]);
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let store = MemoryStore::new(fixture());
        let filter = JobFilter::default()
            .with_status(Some(JobStatus::Error))
            .with_start_from(Some(Utc.with_ymd_and_hms(2025, 2, 25, 10, 0, 0).unwrap()))
            .with_id_contains("00");

        let page = list(&store, filter, 1, 10).await;
        assert_eq!(ids(&page), vec!["job-004", "job-007"]);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_listing() {
        let mut store = MemoryStore::new(fixture());
        store.broken = Some("job-009.parquet".to_string());

        // The failing file lies beyond the requested page
        let request = PageRequest::new(Some(1), Some(2)).unwrap();
        let result = list_jobs(&store, &JobFilter::default(), request, None).await;

        assert!(matches!(
            result,
            Err(LogError::StoreUnavailable(StoreError::CorruptFile { .. }))
        ));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let mut store = MemoryStore::new(fixture());
        store.delay = Some(Duration::from_millis(500));

        let limit = Duration::from_millis(10);
        let result =
            list_jobs(&store, &JobFilter::default(), PageRequest::default(), Some(limit)).await;

        assert!(matches!(result, Err(LogError::DeadlineExceeded(d)) if d == limit));
    }

    #[tokio::test]
    async fn test_single_file_page_inside_file() {
        let store = MemoryStore::single_file(fixture());

        let page = list(&store, JobFilter::default(), 2, 3).await;
        assert_eq!(ids(&page), vec!["job-004", "job-005", "job-006"]);
        assert_eq!(page.total_matched, 10);
    }

    #[tokio::test]
    async fn test_rows_keep_file_order() {
        let mut rows = fixture();
        rows.reverse();
        let store = MemoryStore::single_file(rows);
        let filter = JobFilter::default().with_status(Some(JobStatus::Error));

        let page = list(&store, filter, 1, 10).await;
        assert_eq!(ids(&page), vec!["job-007", "job-004", "job-002"]);
        assert_eq!(page.total_matched, 3);
    }

    #[tokio::test]
    async fn test_page_window_spans_files() {
        let mut rows = fixture();
        let second = rows.split_off(5);
        let store = MemoryStore::with_files(vec![
            ("a.parquet".to_string(), rows),
            ("b.parquet".to_string(), second),
        ]);

        let page = list(&store, JobFilter::default(), 2, 4).await;
        assert_eq!(ids(&page), vec!["job-005", "job-006", "job-007", "job-008"]);
        assert_eq!(page.total_matched, 10);
    }

    #[tokio::test]
    async fn test_deadline_bounds_slow_decoding() {
        let rows = fixture().into_iter().take(2).collect();
        let mut store = MemoryStore::single_file(rows);
        store.row_delay = Some(Duration::from_millis(250));

        let limit = Duration::from_millis(20);
        let started = std::time::Instant::now();
        let result =
            list_jobs(&store, &JobFilter::default(), PageRequest::default(), Some(limit)).await;

        assert!(matches!(result, Err(LogError::DeadlineExceeded(d)) if d == limit));
        assert!(started.elapsed() < Duration::from_millis(250));
    }
}
