//! Log API Handlers
//!
//! HTTP endpoint listing job execution records.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use joblog_core::domain::job::JobStatus;
use joblog_core::dto::log::LogPage;
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::log_service::{self, JobFilter, LogError, PageRequest};

/// GET /api/v1/logs
/// List job records, one page at a time
///
/// Query parameters (all optional):
/// - `page`, `size`: 1-based page and page size; non-numeric values fall back to 1 and 10
/// - `search`: case-insensitive substring of the job id
/// - `status`: `success`, `error` or `all`
/// - `startDate`, `endDate`: RFC 3339 instant or `YYYY-MM-DD`, both inclusive
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogsQuery>,
) -> ApiResult<Json<LogPage>> {
    tracing::debug!("Listing logs: {:?}", params);

    let page = PageRequest::new(lenient_int(&params.page), lenient_int(&params.size))
        .map_err(map_log_error)?;
    let filter = params.filter()?;

    let listed = log_service::list_jobs(state.store.as_ref(), &filter, page, state.read_timeout)
        .await
        .map_err(map_log_error)?;

    Ok(Json(LogPage {
        page: page.page,
        page_size: page.page_size,
        total_files: listed.total_matched,
        logs: listed.items,
    }))
}

fn map_log_error(err: LogError) -> ApiError {
    match err {
        LogError::StoreUnavailable(err) => ApiError::StoreUnavailable(err),
        LogError::DeadlineExceeded(limit) => {
            ApiError::ReadFailed(format!("timed out after {:?}", limit))
        }
        LogError::ScanAborted(reason) => ApiError::ReadFailed(reason),
        LogError::InvalidPageSize(size) => {
            ApiError::BadRequest(format!("Page size must be greater than 0 (got {})", size))
        }
    }
}

// =============================================================================
// Query Parsing
// =============================================================================

/// Raw query string; values stay strings so bad numbers can fall back to defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl LogsQuery {
    fn filter(&self) -> ApiResult<JobFilter> {
        let status = parse_status(non_blank(&self.status))?;
        let start_from = non_blank(&self.start_date)
            .map(|value| parse_bound(value, DayEdge::Start))
            .transpose()?;
        let end_to = non_blank(&self.end_date)
            .map(|value| parse_bound(value, DayEdge::End))
            .transpose()?;

        Ok(JobFilter::default()
            .with_id_contains(self.search.as_deref().unwrap_or_default())
            .with_status(status)
            .with_start_from(start_from)
            .with_end_to(end_to))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn lenient_int(value: &Option<String>) -> Option<i64> {
    non_blank(value).and_then(|v| v.parse().ok())
}

fn parse_status(value: Option<&str>) -> ApiResult<Option<JobStatus>> {
    match value {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v
            .parse::<JobStatus>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(format!("{}", e))),
    }
}

/// Which end of the day a date-only bound stands for
#[derive(Debug, Clone, Copy)]
enum DayEdge {
    Start,
    End,
}

fn parse_bound(value: &str, edge: DayEdge) -> ApiResult<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid date '{}': expected RFC 3339 or YYYY-MM-DD",
            value
        ))
    })?;

    let time = match edge {
        DayEdge::Start => NaiveTime::MIN,
        DayEdge::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| ApiError::InternalError("Invalid end of day".to_string()))?,
    };

    Ok(date.and_time(time).and_utc())
}
