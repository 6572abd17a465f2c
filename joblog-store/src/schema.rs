//! Columnar layout of job record files.
//!
//! Matches the files produced by the offline generation step: timestamps are
//! ISO-8601 strings, lists are repeated columns and operators are a repeated
//! group nested in each job row.

use std::sync::{Arc, LazyLock};

use arrow::datatypes::{DataType, Field, Fields, Schema, SchemaRef};

pub const ID: &str = "id";
pub const START_TIME: &str = "startTime";
pub const END_TIME: &str = "endTime";
pub const DURATION: &str = "duration";
pub const NUM_EXECUTORS: &str = "numExecutors";
pub const STATUS: &str = "status";
pub const ERRORS: &str = "errors";
pub const OPERATORS: &str = "operators";

pub const OPERATOR_ID: &str = "operatorId";
pub const OPERATOR_TYPE: &str = "operatorType";
pub const DEPENDENCIES: &str = "dependencies";

/// File extension of record files
pub const EXTENSION: &str = "parquet";

static SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| Arc::new(schema()));

/// Arrow schema of a job record file.
pub fn job_schema() -> SchemaRef {
    SCHEMA.clone()
}

/// Fields of one entry of the `operators` list.
pub fn operator_fields() -> Fields {
    Fields::from(vec![
        Field::new(OPERATOR_ID, DataType::Utf8, false),
        Field::new(OPERATOR_TYPE, DataType::Utf8, false),
        Field::new(DURATION, DataType::Int32, false),
        Field::new(DEPENDENCIES, string_list_type(), false),
        Field::new(ERRORS, string_list_type(), false),
    ])
}

/// Item field of the `operators` list.
pub fn operator_item_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Struct(operator_fields()), true))
}

/// List of UTF8 strings, laid out the way `ListBuilder<StringBuilder>` builds it.
pub fn string_list_type() -> DataType {
    DataType::List(Arc::new(Field::new("item", DataType::Utf8, true)))
}

fn schema() -> Schema {
    Schema::new(vec![
        Field::new(ID, DataType::Utf8, false),
        // ISO 8601 strings
        Field::new(START_TIME, DataType::Utf8, false),
        Field::new(END_TIME, DataType::Utf8, false),
        // Seconds
        Field::new(DURATION, DataType::Int64, false),
        Field::new(NUM_EXECUTORS, DataType::Int32, false),
        // "success" | "error"
        Field::new(STATUS, DataType::Utf8, false),
        Field::new(ERRORS, string_list_type(), false),
        Field::new(
            OPERATORS,
            DataType::List(operator_item_field()),
            false,
        ),
    ])
}
