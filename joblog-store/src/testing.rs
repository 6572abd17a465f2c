//! Shared fixtures for store tests.

use joblog_core::domain::job::{JobRecord, JobStatus, OperatorRecord};

use crate::{Result, RowCursor};

pub fn job(id: &str) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        start_time: "2025-02-25T08:00:00Z".parse().unwrap(),
        end_time: "2025-02-25T08:05:00Z".parse().unwrap(),
        duration_seconds: 300,
        num_executors: 8,
        status: JobStatus::Success,
        errors: Vec::new(),
        operators: vec![
            OperatorRecord {
                operator_id: format!("{id}-op-1"),
                operator_type: "ReadParquet".to_string(),
                duration_seconds: 50,
                dependencies: Vec::new(),
                errors: Vec::new(),
            },
            OperatorRecord {
                operator_id: format!("{id}-op-2"),
                operator_type: "Filter".to_string(),
                duration_seconds: 30,
                dependencies: vec![format!("{id}-op-1")],
                errors: Vec::new(),
            },
        ],
    }
}

pub fn drain(mut cursor: Box<dyn RowCursor>) -> Result<Vec<JobRecord>> {
    let mut records = Vec::new();
    while let Some(record) = cursor.next_record()? {
        records.push(record);
    }
    Ok(records)
}
