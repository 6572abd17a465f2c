//! Job domain types

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Job execution record
///
/// One finished (or failed) execution, as produced by the offline generation
/// step and served read-only by the log service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    pub num_executors: u32,
    pub status: JobStatus,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub operators: Vec<OperatorRecord>,
}

/// One step of a job's execution plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorRecord {
    pub operator_id: String,
    pub operator_type: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Final job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(JobStatus::Success),
            "error" => Ok(JobStatus::Error),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// A single rule a job record breaks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("end time {end} is before start time {start}")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("duration is {recorded}s but start/end span {actual}s")]
    DurationMismatch { recorded: u64, actual: i64 },

    #[error("numExecutors must be greater than 0")]
    NoExecutors,

    #[error("successful job carries {0} error message(s)")]
    ErrorsOnSuccess(usize),

    #[error("duplicate operator id: {0}")]
    DuplicateOperator(String),

    #[error("operator {operator} depends on unknown operator {dependency}")]
    UnknownDependency {
        operator: String,
        dependency: String,
    },

    #[error("operator dependencies form a cycle")]
    DependencyCycle,
}

/// All rules a job record breaks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job {id} is invalid: {}", format_issues(.issues))]
pub struct InvalidJobRecord {
    pub id: String,
    pub issues: Vec<ValidationIssue>,
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl JobRecord {
    /// Checks timing, status and operator graph consistency
    ///
    /// Only the ingestion path validates; stored records are served as-is.
    pub fn validate(&self) -> Result<(), InvalidJobRecord> {
        let mut issues = Vec::new();

        let actual = (self.end_time - self.start_time).num_seconds();
        if actual < 0 {
            issues.push(ValidationIssue::EndBeforeStart {
                start: self.start_time,
                end: self.end_time,
            });
        } else if actual as u64 != self.duration_seconds {
            issues.push(ValidationIssue::DurationMismatch {
                recorded: self.duration_seconds,
                actual,
            });
        }

        if self.num_executors == 0 {
            issues.push(ValidationIssue::NoExecutors);
        }

        if self.status == JobStatus::Success && !self.errors.is_empty() {
            issues.push(ValidationIssue::ErrorsOnSuccess(self.errors.len()));
        }

        issues.extend(self.operator_graph_issues());

        if issues.is_empty() {
            Ok(())
        } else {
            Err(InvalidJobRecord {
                id: self.id.clone(),
                issues,
            })
        }
    }

    fn operator_graph_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let mut ids = HashSet::new();
        for op in &self.operators {
            if !ids.insert(op.operator_id.as_str()) {
                issues.push(ValidationIssue::DuplicateOperator(op.operator_id.clone()));
            }
        }

        for op in &self.operators {
            for dep in &op.dependencies {
                if !ids.contains(dep.as_str()) {
                    issues.push(ValidationIssue::UnknownDependency {
                        operator: op.operator_id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        if !issues.is_empty() {
            return issues;
        }

        // Kahn's algorithm: every operator must be reachable in topological order
        let mut in_degree: HashMap<&str, usize> = self
            .operators
            .iter()
            .map(|op| (op.operator_id.as_str(), op.dependencies.len()))
            .collect();
        let mut downstream: HashMap<&str, Vec<&str>> = HashMap::new();
        for op in &self.operators {
            for dep in &op.dependencies {
                downstream
                    .entry(dep.as_str())
                    .or_default()
                    .push(op.operator_id.as_str());
            }
        }

        let mut ready: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut visited = 0;

        while let Some(id) = ready.pop_front() {
            visited += 1;
            for next in downstream.get(id).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }

        if visited != self.operators.len() {
            issues.push(ValidationIssue::DependencyCycle);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(id: &str, deps: &[&str]) -> OperatorRecord {
        OperatorRecord {
            operator_id: id.to_string(),
            operator_type: "Filter".to_string(),
            duration_seconds: 10,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            errors: Vec::new(),
        }
    }

    fn job() -> JobRecord {
        JobRecord {
            id: "job-001".to_string(),
            start_time: "2025-02-25T08:00:00Z".parse().unwrap(),
            end_time: "2025-02-25T08:05:00Z".parse().unwrap(),
            duration_seconds: 300,
            num_executors: 8,
            status: JobStatus::Success,
            errors: Vec::new(),
            operators: vec![
                operator("op-101", &[]),
                operator("op-102", &["op-101"]),
                operator("op-103", &["op-102"]),
            ],
        }
    }

    #[test]
    fn test_valid_record() {
        assert!(job().validate().is_ok());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("success".parse::<JobStatus>(), Ok(JobStatus::Success));
        assert_eq!(" ERROR ".parse::<JobStatus>(), Ok(JobStatus::Error));
        assert!("failed".parse::<JobStatus>().is_err());
        assert_eq!(JobStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_duration_mismatch() {
        let mut record = job();
        record.duration_seconds = 299;

        let err = record.validate().unwrap_err();
        assert_eq!(
            err.issues,
            vec![ValidationIssue::DurationMismatch {
                recorded: 299,
                actual: 300
            }]
        );
    }

    #[test]
    fn test_end_before_start() {
        let mut record = job();
        std::mem::swap(&mut record.start_time, &mut record.end_time);

        let err = record.validate().unwrap_err();
        assert!(matches!(
            err.issues[0],
            ValidationIssue::EndBeforeStart { .. }
        ));
    }

    #[test]
    fn test_success_with_errors_and_no_executors() {
        let mut record = job();
        record.errors.push("Out of memory".to_string());
        record.num_executors = 0;

        let err = record.validate().unwrap_err();
        assert!(err.issues.contains(&ValidationIssue::NoExecutors));
        assert!(err.issues.contains(&ValidationIssue::ErrorsOnSuccess(1)));
    }

    #[test]
    fn test_unknown_dependency() {
        let mut record = job();
        record.operators.push(operator("op-104", &["op-999"]));

        let err = record.validate().unwrap_err();
        assert_eq!(
            err.issues,
            vec![ValidationIssue::UnknownDependency {
                operator: "op-104".to_string(),
                dependency: "op-999".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_operator() {
        let mut record = job();
        record.operators.push(operator("op-101", &[]));

        let err = record.validate().unwrap_err();
        assert!(
            err.issues
                .contains(&ValidationIssue::DuplicateOperator("op-101".to_string()))
        );
    }

    #[test]
    fn test_dependency_cycle() {
        let mut record = job();
        record.operators[0].dependencies.push("op-103".to_string());

        let err = record.validate().unwrap_err();
        assert_eq!(err.issues, vec![ValidationIssue::DependencyCycle]);
        assert!(err.to_string().contains("job-001"));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(job()).unwrap();

        assert_eq!(json["startTime"], "2025-02-25T08:00:00Z");
        assert_eq!(json["duration"], 300);
        assert_eq!(json["numExecutors"], 8);
        assert_eq!(json["status"], "success");
        assert_eq!(json["operators"][1]["operatorId"], "op-102");
        assert_eq!(json["operators"][1]["dependencies"][0], "op-101");
    }
}
