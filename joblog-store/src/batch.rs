//! Conversion between job records and Arrow record batches.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, Int32Array, Int64Array, ListArray, ListBuilder, StringArray,
    StringBuilder, StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, SecondsFormat, Utc};
use joblog_core::domain::job::{JobRecord, JobStatus, OperatorRecord};

use crate::error::{Result, StoreError};
use crate::schema;

// =============================================================================
// Encoding
// =============================================================================

/// Build one record batch holding `records` in order.
pub fn encode_batch(records: &[JobRecord]) -> Result<RecordBatch> {
    let encoding = |e: &dyn std::fmt::Display| StoreError::Encoding(e.to_string());

    let durations = records
        .iter()
        .map(|r| i64::try_from(r.duration_seconds))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| encoding(&e))?;
    let executors = records
        .iter()
        .map(|r| i32::try_from(r.num_executors))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| encoding(&e))?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| &r.id))),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| format_time(&r.start_time)),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| format_time(&r.end_time)),
        )),
        Arc::new(Int64Array::from(durations)),
        Arc::new(Int32Array::from(executors)),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.status.as_str()),
        )),
        Arc::new(string_list(records.iter().map(|r| r.errors.as_slice()))),
        Arc::new(encode_operators(records)?),
    ];

    RecordBatch::try_new(schema::job_schema(), columns).map_err(|e| encoding(&e))
}

fn encode_operators(records: &[JobRecord]) -> Result<ListArray> {
    let operators: Vec<&OperatorRecord> = records.iter().flat_map(|r| &r.operators).collect();

    let durations = operators
        .iter()
        .map(|op| i32::try_from(op.duration_seconds))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Encoding(e.to_string()))?;

    let entries = StructArray::try_new(
        schema::operator_fields(),
        vec![
            Arc::new(StringArray::from_iter_values(
                operators.iter().map(|op| &op.operator_id),
            )),
            Arc::new(StringArray::from_iter_values(
                operators.iter().map(|op| &op.operator_type),
            )),
            Arc::new(Int32Array::from(durations)),
            Arc::new(string_list(
                operators.iter().map(|op| op.dependencies.as_slice()),
            )),
            Arc::new(string_list(operators.iter().map(|op| op.errors.as_slice()))),
        ],
        None,
    )
    .map_err(|e| StoreError::Encoding(e.to_string()))?;

    let offsets = OffsetBuffer::from_lengths(records.iter().map(|r| r.operators.len()));

    ListArray::try_new(
        schema::operator_item_field(),
        offsets,
        Arc::new(entries),
        None,
    )
    .map_err(|e| StoreError::Encoding(e.to_string()))
}

fn string_list<'a>(rows: impl Iterator<Item = &'a [String]>) -> ListArray {
    let mut builder = ListBuilder::new(StringBuilder::new());
    for row in rows {
        for value in row {
            builder.values().append_value(value);
        }
        builder.append(true);
    }
    builder.finish()
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode every row of `batch`; `name` identifies the file in errors.
pub fn decode_batch(name: &str, batch: &RecordBatch) -> Result<Vec<JobRecord>> {
    let rows = Rows { name, batch };

    let ids = rows.strings(schema::ID)?;
    let start_times = rows.strings(schema::START_TIME)?;
    let end_times = rows.strings(schema::END_TIME)?;
    let durations = rows.column(schema::DURATION)?;
    let executors = rows.column(schema::NUM_EXECUTORS)?;
    let statuses = rows.strings(schema::STATUS)?;
    let errors = rows.lists(schema::ERRORS)?;
    let operators = rows.lists(schema::OPERATORS)?;

    (0..batch.num_rows())
        .map(|row| {
            let status = required_str(name, statuses, schema::STATUS, row)?;
            let status = status
                .parse::<JobStatus>()
                .map_err(|e| StoreError::corrupt(name, e))?;

            Ok(JobRecord {
                id: required_str(name, ids, schema::ID, row)?.to_string(),
                start_time: parse_time(
                    name,
                    required_str(name, start_times, schema::START_TIME, row)?,
                )?,
                end_time: parse_time(name, required_str(name, end_times, schema::END_TIME, row)?)?,
                duration_seconds: int_at(name, durations, schema::DURATION, row)?,
                num_executors: int_at(name, executors, schema::NUM_EXECUTORS, row)?,
                status,
                errors: string_list_at(name, errors, row)?,
                operators: operators_at(name, operators, row)?,
            })
        })
        .collect()
}

/// Column lookup over one batch
struct Rows<'a> {
    name: &'a str,
    batch: &'a RecordBatch,
}

impl<'a> Rows<'a> {
    fn column(&self, column: &str) -> Result<&'a ArrayRef> {
        self.batch
            .column_by_name(column)
            .ok_or_else(|| StoreError::corrupt(self.name, format!("missing column {column}")))
    }

    fn strings(&self, column: &str) -> Result<&'a StringArray> {
        self.column(column)?
            .as_string_opt::<i32>()
            .ok_or_else(|| StoreError::corrupt(self.name, format!("column {column} is not UTF8")))
    }

    fn lists(&self, column: &str) -> Result<&'a ListArray> {
        self.column(column)?
            .as_list_opt::<i32>()
            .ok_or_else(|| StoreError::corrupt(self.name, format!("column {column} is not a list")))
    }
}

fn required_str<'a>(
    name: &str,
    array: &'a StringArray,
    column: &str,
    row: usize,
) -> Result<&'a str> {
    if array.is_null(row) {
        return Err(StoreError::corrupt(
            name,
            format!("null {column} in row {row}"),
        ));
    }
    Ok(array.value(row))
}

/// Integer columns may be written as INT32 or INT64 depending on the producer.
fn int_at<T: TryFrom<i64>>(name: &str, array: &dyn Array, column: &str, row: usize) -> Result<T> {
    let value = if array.is_null(row) {
        None
    } else if let Some(values) = array.as_primitive_opt::<Int64Type>() {
        Some(values.value(row))
    } else {
        array
            .as_primitive_opt::<Int32Type>()
            .map(|values| i64::from(values.value(row)))
    };

    let value = value.ok_or_else(|| {
        StoreError::corrupt(name, format!("{column} in row {row} is not an integer"))
    })?;

    T::try_from(value).map_err(|_| {
        StoreError::corrupt(name, format!("{column} in row {row} is out of range: {value}"))
    })
}

fn string_list_at(name: &str, lists: &ListArray, row: usize) -> Result<Vec<String>> {
    if lists.is_null(row) {
        return Ok(Vec::new());
    }

    let values = lists.value(row);
    let strings = values
        .as_string_opt::<i32>()
        .ok_or_else(|| StoreError::corrupt(name, "list entries are not UTF8"))?;

    Ok(strings.iter().flatten().map(str::to_string).collect())
}

fn operators_at(name: &str, lists: &ListArray, row: usize) -> Result<Vec<OperatorRecord>> {
    if lists.is_null(row) {
        return Ok(Vec::new());
    }

    let values = lists.value(row);
    let entries = values
        .as_struct_opt()
        .ok_or_else(|| StoreError::corrupt(name, "operators are not a struct list"))?;

    let field = |column: &str| {
        entries.column_by_name(column).ok_or_else(|| {
            StoreError::corrupt(name, format!("missing operator field {column}"))
        })
    };
    let ids = field(schema::OPERATOR_ID)?
        .as_string_opt::<i32>()
        .ok_or_else(|| StoreError::corrupt(name, "operatorId is not UTF8"))?;
    let types = field(schema::OPERATOR_TYPE)?
        .as_string_opt::<i32>()
        .ok_or_else(|| StoreError::corrupt(name, "operatorType is not UTF8"))?;
    let durations = field(schema::DURATION)?;
    let dependencies = field(schema::DEPENDENCIES)?
        .as_list_opt::<i32>()
        .ok_or_else(|| StoreError::corrupt(name, "dependencies is not a list"))?;
    let errors = field(schema::ERRORS)?
        .as_list_opt::<i32>()
        .ok_or_else(|| StoreError::corrupt(name, "operator errors is not a list"))?;

    (0..entries.len())
        .map(|i| {
            Ok(OperatorRecord {
                operator_id: required_str(name, ids, schema::OPERATOR_ID, i)?.to_string(),
                operator_type: required_str(name, types, schema::OPERATOR_TYPE, i)?.to_string(),
                duration_seconds: int_at(name, durations, schema::DURATION, i)?,
                dependencies: string_list_at(name, dependencies, i)?,
                errors: string_list_at(name, errors, i)?,
            })
        })
        .collect()
}

fn parse_time(name: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(name, format!("invalid timestamp {value:?}: {e}")))
}
