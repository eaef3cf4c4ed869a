//! Conversion of field values into driver-safe bind values.
//!
//! The encoding policy, checked in order:
//!
//! 1. NULL and scalar values pass through unchanged.
//! 2. Temporal values are formatted to the canonical string form of the
//!    declared column type; a temporal value against a non-temporal column
//!    is an error.
//! 3. Computed values are invoked and their result encoded recursively.
//! 4. JSON documents serialize to JSON text for non-temporal columns;
//!    arrays serialize to JSON text only for JSON columns.
//! 5. Anything else is an error naming the value kind.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};
use crate::types::SqlType;
use crate::value::Value;

const TEMPORAL_MISMATCH: &str = "incorrect temporal/column type combination";

/// Encode a field value as a bind value for its declared column type.
pub fn encode(sql_type: SqlType, value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        scalar if scalar.is_scalar() => Ok(scalar.clone()),
        Value::Date(date) => encode_date(sql_type, *date),
        Value::Time(time) => encode_time(sql_type, *time),
        Value::DateTime(datetime) => encode_datetime(sql_type, *datetime),
        Value::Computed(compute) => encode(sql_type, &compute()),
        Value::Json(document) => {
            if sql_type.is_temporal() {
                Err(codec_error(value, sql_type))
            } else {
                Ok(Value::Text(serde_json::to_string(document).map_err(
                    |e| Error::codec(format!("cannot serialize json value: {e}")),
                )?))
            }
        }
        Value::Array(items) => {
            if sql_type == SqlType::Json {
                Ok(Value::Text(serde_json::to_string(items).map_err(|e| {
                    Error::codec(format!("cannot serialize array value: {e}"))
                })?))
            } else {
                Err(codec_error(value, sql_type))
            }
        }
        other => Err(codec_error(other, sql_type)),
    }
}

fn encode_date(sql_type: SqlType, date: NaiveDate) -> Result<Value> {
    match sql_type {
        SqlType::Date => Ok(Value::Text(date.format("%Y-%m-%d").to_string())),
        SqlType::DateTime | SqlType::Timestamp => Ok(Value::Text(
            date.and_hms_opt(0, 0, 0)
                .unwrap_or_default()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        )),
        _ => Err(Error::codec(TEMPORAL_MISMATCH)),
    }
}

fn encode_time(sql_type: SqlType, time: NaiveTime) -> Result<Value> {
    match sql_type {
        SqlType::Time => Ok(Value::Text(time.format("%H:%M:%S").to_string())),
        _ => Err(Error::codec(TEMPORAL_MISMATCH)),
    }
}

fn encode_datetime(sql_type: SqlType, datetime: NaiveDateTime) -> Result<Value> {
    match sql_type {
        SqlType::Date => Ok(Value::Text(datetime.format("%Y-%m-%d").to_string())),
        SqlType::Time => Ok(Value::Text(datetime.format("%H:%M:%S").to_string())),
        SqlType::DateTime | SqlType::Timestamp => {
            Ok(Value::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()))
        }
        _ => Err(Error::codec(TEMPORAL_MISMATCH)),
    }
}

fn codec_error(value: &Value, sql_type: SqlType) -> Error {
    Error::codec(format!(
        "cannot encode {} value into a {} column",
        value.kind(),
        sql_type.sql_name()
    ))
}
