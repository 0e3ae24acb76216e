//! Typed columnar result frames.
//!
//! Remote column types map onto a small set of semantic types:
//!
//! | Remote type | [`FieldType`] |
//! |-------------|---------------|
//! | `BOOLEAN` | `Boolean` |
//! | `INTEGER`, `BIGINT`, `FLOAT`, `DOUBLE`, `DECIMAL` | `Number` |
//! | `VARCHAR` | `String` |
//! | `TIME`, `DATE`, `TIMESTAMP` | `Time` |
//! | anything else | `Other` |
//!
//! Matching ignores case. The configured time column is always `Time`.

use super::models::{Row, SchemaField};
use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, StringBuilder, TimestampMillisecondBuilder,
};
use arrow::datatypes::{DataType, Field as ArrowField, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use quarry_error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Number,
    String,
    Time,
    Other,
}

impl FieldType {
    pub fn from_remote(type_name: &str) -> Self {
        match type_name.trim().to_ascii_uppercase().as_str() {
            "BOOLEAN" => FieldType::Boolean,
            "INTEGER" | "BIGINT" | "FLOAT" | "DOUBLE" | "DECIMAL" => FieldType::Number,
            "VARCHAR" => FieldType::String,
            "TIME" | "DATE" | "TIMESTAMP" => FieldType::Time,
            _ => FieldType::Other,
        }
    }

    /// Type of column `name`; `time_col` wins over the remote type.
    pub fn resolve(name: &str, type_name: &str, time_col: &str) -> Self {
        if name == time_col {
            FieldType::Time
        } else {
            Self::from_remote(type_name)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Time => "time",
            FieldType::Other => "other",
        }
    }

    fn arrow_type(&self) -> DataType {
        match self {
            FieldType::Boolean => DataType::Boolean,
            FieldType::Number => DataType::Float64,
            FieldType::Time => DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            FieldType::String | FieldType::Other => DataType::Utf8,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column: every value of it in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFrame {
    pub ref_id: String,
    pub fields: Vec<Field>,
}

impl ResultFrame {
    pub fn empty(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            fields: Vec::new(),
        }
    }

    /// Build a frame with one field per schema column, in schema order.
    ///
    /// A row without a value for some column contributes `null` to it; keys a row
    /// carries beyond the schema are ignored.
    pub fn from_rows(
        ref_id: impl Into<String>,
        schema: &[SchemaField],
        rows: &[Row],
        time_col: &str,
    ) -> Self {
        let fields = schema
            .iter()
            .map(|column| Field {
                name: column.name.clone(),
                field_type: FieldType::resolve(&column.name, &column.field_type.name, time_col),
                values: rows
                    .iter()
                    .map(|row| row.get(&column.name).cloned().unwrap_or(Value::Null))
                    .collect(),
            })
            .collect();

        Self {
            ref_id: ref_id.into(),
            fields,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, |f| f.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Convert into an Arrow batch. Values that do not fit the column type become nulls.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(
            self.fields
                .iter()
                .map(|f| ArrowField::new(&f.name, f.field_type.arrow_type(), true))
                .collect::<Vec<_>>(),
        ));
        if self.fields.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }

        let columns: Vec<ArrayRef> = self.fields.iter().map(build_column).collect();
        Ok(RecordBatch::try_new(schema, columns)?)
    }
}

fn build_column(field: &Field) -> ArrayRef {
    match field.field_type {
        FieldType::Boolean => {
            let mut builder = BooleanBuilder::with_capacity(field.values.len());
            for value in &field.values {
                builder.append_option(to_bool(value));
            }
            Arc::new(builder.finish())
        }
        FieldType::Number => {
            let mut builder = Float64Builder::with_capacity(field.values.len());
            for value in &field.values {
                builder.append_option(to_f64(value));
            }
            Arc::new(builder.finish())
        }
        FieldType::Time => {
            let mut builder =
                TimestampMillisecondBuilder::with_capacity(field.values.len()).with_timezone("UTC");
            for value in &field.values {
                builder.append_option(to_epoch_millis(value));
            }
            Arc::new(builder.finish())
        }
        FieldType::String | FieldType::Other => {
            let mut builder = StringBuilder::new();
            for value in &field.values {
                match value {
                    Value::Null => builder.append_null(),
                    Value::String(s) => builder.append_value(s),
                    other => builder.append_value(other.to_string()),
                }
            }
            Arc::new(builder.finish())
        }
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        // DECIMAL columns arrive as strings
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_epoch_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => parse_time(s.trim()),
        _ => None,
    }
}

/// Epoch milliseconds of a timestamp, date or time-of-day string.
///
/// Zoneless values are taken as UTC; a bare time of day counts from midnight.
pub fn parse_time(s: &str) -> Option<i64> {
    if let Ok(ms) = s.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .ok()
        .map(|t| {
            i64::from(t.num_seconds_from_midnight()) * 1000
                + i64::from(t.nanosecond() / 1_000_000)
        })
}
