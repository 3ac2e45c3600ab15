use crate::db::result_set::{Column, ColumnType, ResultSet, Value};
use crate::error::PipelineError;
use arrow::array::{Array, ArrayRef, AsArray, PrimitiveArray};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Decimal128Type, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use duckdb::Connection;
use std::time::Instant;
use tracing::{debug, info};

/// Runs `sql` exactly as given and collects every row.
///
/// The text is not inspected, limited or parameterized. A query that yields
/// no rows produces an empty result set; any error raised by the database is
/// returned with its original message.
pub fn execute(conn: &Connection, sql: &str) -> Result<ResultSet, PipelineError> {
    let start_time = Instant::now();

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| PipelineError::Execution(Box::new(e)))?;
    let arrow_batch = stmt
        .query_arrow([])
        .map_err(|e| PipelineError::Execution(Box::new(e)))?;

    let schema = arrow_batch.get_schema();
    let columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|field| Column {
            name: field.name().clone(),
            column_type: column_type(field.data_type()),
        })
        .collect();

    let record_batches: Vec<RecordBatch> = arrow_batch.collect();

    let mut rows = Vec::new();
    for batch in &record_batches {
        append_rows(batch, &mut rows).map_err(|e| PipelineError::Execution(Box::new(e)))?;
    }

    info!(
        "Query returned {} rows x {} columns in {} ms",
        rows.len(),
        columns.len(),
        start_time.elapsed().as_millis()
    );
    debug!("Result columns: {:?}", columns);

    Ok(ResultSet::new(columns, rows))
}

fn column_type(data_type: &DataType) -> ColumnType {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => ColumnType::Integer,
        DataType::Float32 | DataType::Float64 => ColumnType::Float,
        DataType::Decimal128(_, _) => ColumnType::Decimal,
        DataType::Boolean => ColumnType::Boolean,
        DataType::Utf8 | DataType::LargeUtf8 => ColumnType::Text,
        DataType::Date32
        | DataType::Date64
        | DataType::Time32(_)
        | DataType::Time64(_)
        | DataType::Timestamp(_, _) => ColumnType::Temporal,
        other => ColumnType::Other(other.to_string()),
    }
}

fn append_rows(batch: &RecordBatch, rows: &mut Vec<Vec<Value>>) -> Result<(), arrow::error::ArrowError> {
    let first = rows.len();
    rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(batch.num_columns())));

    for array in batch.columns() {
        for (offset, value) in column_values(array)?.into_iter().enumerate() {
            rows[first + offset].push(value);
        }
    }

    Ok(())
}

fn column_values(array: &ArrayRef) -> Result<Vec<Value>, arrow::error::ArrowError> {
    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; array.len()],
        DataType::Boolean => array
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Boolean))
            .collect(),
        DataType::Int8 => integers(array.as_primitive::<Int8Type>()),
        DataType::Int16 => integers(array.as_primitive::<Int16Type>()),
        DataType::Int32 => integers(array.as_primitive::<Int32Type>()),
        DataType::Int64 => integers(array.as_primitive::<Int64Type>()),
        DataType::UInt8 => integers(array.as_primitive::<UInt8Type>()),
        DataType::UInt16 => integers(array.as_primitive::<UInt16Type>()),
        DataType::UInt32 => integers(array.as_primitive::<UInt32Type>()),
        DataType::UInt64 => array
            .as_primitive::<UInt64Type>()
            .iter()
            .map(|v| match v {
                Some(v) => i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer),
                None => Value::Null,
            })
            .collect(),
        DataType::Float32 => floats(array.as_primitive::<Float32Type>()),
        DataType::Float64 => floats(array.as_primitive::<Float64Type>()),
        DataType::Decimal128(_, scale) => {
            let divisor = 10f64.powi(i32::from(*scale));
            array
                .as_primitive::<Decimal128Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, |v| Value::Float(v as f64 / divisor)))
                .collect()
        }
        DataType::Utf8 => array
            .as_string::<i32>()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        DataType::LargeUtf8 => array
            .as_string::<i64>()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::from))
            .collect(),
        _ => {
            // Dates, timestamps, lists, structs... shown the way arrow prints them
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            (0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(formatter.value(i).to_string())
                    }
                })
                .collect()
        }
    };

    Ok(values)
}

fn integers<T>(array: &PrimitiveArray<T>) -> Vec<Value>
where
    T: ArrowPrimitiveType,
    T::Native: Into<i64>,
{
    array
        .iter()
        .map(|v| v.map_or(Value::Null, |v| Value::Integer(v.into())))
        .collect()
}

fn floats<T>(array: &PrimitiveArray<T>) -> Vec<Value>
where
    T: ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    array
        .iter()
        .map(|v| v.map_or(Value::Null, |v| Value::Float(v.into())))
        .collect()
}
