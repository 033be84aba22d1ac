//! Parquet writer built on the low-level column writer API.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::basic::{LogicalType, Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::{Type, TypePtr};

use crate::error::{TableFmtError, TableFmtResult};
use crate::types::{DataType, Schema, Table, Value};

/// Definition level of a present value in an OPTIONAL top-level column.
const PRESENT: i16 = 1;
/// Definition level of a missing value.
const MISSING: i16 = 0;

/// Write `table` to a single Parquet file at `path`.
///
/// Every column is OPTIONAL, column order is kept, and all rows go into one row group (no row
/// group at all for an empty table). Reading the file back with
/// [`crate::reader::read_parquet`] yields an equal table.
pub fn write_parquet(table: &Table, path: impl AsRef<Path>) -> TableFmtResult<()> {
    table.validate()?;
    let parquet_schema = parquet_schema(&table.schema)?;

    let file = File::create(path)?;
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, parquet_schema, props)?;

    if table.row_count() > 0 {
        let mut rg = writer.next_row_group()?;
        let mut col_idx: usize = 0;
        while let Some(mut col) = rg.next_column()? {
            write_column(table, col_idx, col.untyped())?;
            col.close()?;
            col_idx += 1;
        }
        rg.close()?;
    }

    writer.close()?;
    Ok(())
}

/// Map the table schema onto a flat Parquet message type.
fn parquet_schema(schema: &Schema) -> TableFmtResult<TypePtr> {
    let mut fields: Vec<TypePtr> = Vec::with_capacity(schema.len());
    for field in &schema.fields {
        let (physical, logical) = match field.data_type {
            DataType::Int64 => (PhysicalType::INT64, None),
            DataType::Float64 => (PhysicalType::DOUBLE, None),
            DataType::Bool => (PhysicalType::BOOLEAN, None),
            DataType::Utf8 => (PhysicalType::BYTE_ARRAY, Some(LogicalType::String)),
            DataType::Null => (PhysicalType::INT32, Some(LogicalType::Unknown)),
        };
        let column = Type::primitive_type_builder(&field.name, physical)
            .with_repetition(Repetition::OPTIONAL)
            .with_logical_type(logical)
            .build()?;
        fields.push(Arc::new(column));
    }

    let message = Type::group_type_builder("schema")
        .with_fields(fields)
        .build()?;
    Ok(Arc::new(message))
}

fn write_column(table: &Table, idx: usize, writer: &mut ColumnWriter<'_>) -> TableFmtResult<()> {
    let def_levels: Vec<i16> = table
        .column(idx)
        .map(|v| if matches!(v, Value::Null) { MISSING } else { PRESENT })
        .collect();

    match writer {
        ColumnWriter::Int64ColumnWriter(w) => {
            let values: Vec<i64> = table
                .column(idx)
                .filter_map(|v| match v {
                    Value::Int64(v) => Some(*v),
                    _ => None,
                })
                .collect();
            w.write_batch(&values, Some(def_levels.as_slice()), None)?;
        }
        ColumnWriter::DoubleColumnWriter(w) => {
            let values: Vec<f64> = table
                .column(idx)
                .filter_map(|v| match v {
                    Value::Float64(v) => Some(*v),
                    _ => None,
                })
                .collect();
            w.write_batch(&values, Some(def_levels.as_slice()), None)?;
        }
        ColumnWriter::BoolColumnWriter(w) => {
            let values: Vec<bool> = table
                .column(idx)
                .filter_map(|v| match v {
                    Value::Bool(v) => Some(*v),
                    _ => None,
                })
                .collect();
            w.write_batch(&values, Some(def_levels.as_slice()), None)?;
        }
        ColumnWriter::ByteArrayColumnWriter(w) => {
            let values: Vec<ByteArray> = table
                .column(idx)
                .filter_map(|v| match v {
                    Value::Utf8(s) => Some(ByteArray::from(s.as_str())),
                    _ => None,
                })
                .collect();
            w.write_batch(&values, Some(def_levels.as_slice()), None)?;
        }
        // Null columns: only definition levels, no values.
        ColumnWriter::Int32ColumnWriter(w) => {
            w.write_batch(&[], Some(def_levels.as_slice()), None)?;
        }
        _ => {
            return Err(TableFmtError::format(format!(
                "unexpected parquet column writer for column {idx}"
            )));
        }
    }
    Ok(())
}
