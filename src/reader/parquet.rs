//! Parquet reader.

use std::fs::File;
use std::path::Path;

use parquet::basic::{ConvertedType, LogicalType, Repetition, Type as PhysicalType};
use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field as ParquetField;
use parquet::schema::types::{ColumnDescPtr, SchemaDescriptor};

use crate::error::{TableFmtError, TableFmtResult};
use crate::types::{DataType, Field, Schema, Table, Value};

/// Read a Parquet file into an in-memory [`Table`].
///
/// Column types come from the file schema; no inference happens. Only flat schemas are
/// supported. Date, time, timestamp and decimal columns are read as strings.
pub fn read_parquet(path: impl AsRef<Path>) -> TableFmtResult<Table> {
    let file = File::open(path)?;
    let reader = SerializedFileReader::new(file)?;

    let schema = table_schema(reader.metadata().file_metadata().schema_descr())?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.len());
        for (field, (_, value)) in schema.fields.iter().zip(row.get_column_iter()) {
            out_row.push(convert_parquet_field(row_num, field, value)?);
        }
        if out_row.len() != schema.len() {
            return Err(TableFmtError::format(format!(
                "row {row_num} has {} columns, schema has {}",
                out_row.len(),
                schema.len()
            )));
        }
        rows.push(out_row);
    }

    Table::try_new(schema, rows)
}

fn table_schema(descr: &SchemaDescriptor) -> TableFmtResult<Schema> {
    // A flat schema has exactly one leaf column per top-level field.
    if descr.num_columns() != descr.root_schema().get_fields().len() {
        return Err(TableFmtError::format(
            "parquet schema contains nested columns; only flat schemas are supported",
        ));
    }

    let fields = descr
        .columns()
        .iter()
        .map(|col| Ok(Field::new(col.name(), column_type(col)?)))
        .collect::<TableFmtResult<Vec<_>>>()?;
    Ok(Schema::new(fields))
}

fn column_type(col: &ColumnDescPtr) -> TableFmtResult<DataType> {
    let info = col.self_type().get_basic_info();
    if col.path().parts().len() != 1 || info.repetition() == Repetition::REPEATED {
        return Err(TableFmtError::format(format!(
            "column '{}' is nested or repeated; only flat schemas are supported",
            col.path().string()
        )));
    }

    let logical = col.logical_type_ref();
    let data_type = match col.physical_type() {
        PhysicalType::BOOLEAN => DataType::Bool,
        PhysicalType::INT32 if matches!(logical, Some(LogicalType::Unknown)) => DataType::Null,
        PhysicalType::INT32 | PhysicalType::INT64
            if is_plain_integer(logical, col.converted_type()) =>
        {
            DataType::Int64
        }
        PhysicalType::FLOAT | PhysicalType::DOUBLE => DataType::Float64,
        // Strings, raw bytes, and everything the record API renders as text
        // (dates, timestamps, decimals, INT96).
        _ => DataType::Utf8,
    };
    Ok(data_type)
}

fn is_plain_integer(logical: Option<&LogicalType>, converted: ConvertedType) -> bool {
    match logical {
        Some(LogicalType::Integer { .. }) => true,
        Some(_) => false,
        None => matches!(
            converted,
            ConvertedType::NONE
                | ConvertedType::INT_8
                | ConvertedType::INT_16
                | ConvertedType::INT_32
                | ConvertedType::INT_64
                | ConvertedType::UINT_8
                | ConvertedType::UINT_16
                | ConvertedType::UINT_32
                | ConvertedType::UINT_64
        ),
    }
}

fn convert_parquet_field(row: usize, field: &Field, f: &ParquetField) -> TableFmtResult<Value> {
    if let ParquetField::Null = f {
        return Ok(Value::Null);
    }

    let mismatch = |message: &str| {
        TableFmtError::format(format!(
            "row {row} column '{}': {message} (raw='{f}')",
            field.name
        ))
    };

    match field.data_type {
        DataType::Null => Err(mismatch("expected null")),
        DataType::Bool => match f {
            ParquetField::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(mismatch("expected bool")),
        },
        DataType::Int64 => match f {
            ParquetField::Byte(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::Short(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::Int(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::Long(v) => Ok(Value::Int64(*v)),
            ParquetField::UByte(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::UShort(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::UInt(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::ULong(v) => i64::try_from(*v)
                .map(Value::Int64)
                .map_err(|_| mismatch("u64 out of range for i64")),
            _ => Err(mismatch("expected integer")),
        },
        DataType::Float64 => match f {
            ParquetField::Float(v) => Ok(Value::Float64(f64::from(*v))),
            ParquetField::Double(v) => Ok(Value::Float64(*v)),
            _ => Err(mismatch("expected number")),
        },
        DataType::Utf8 => match f {
            ParquetField::Str(s) => Ok(Value::Utf8(s.clone())),
            ParquetField::Bytes(b) => b
                .as_utf8()
                .map(|s| Value::Utf8(s.to_owned()))
                .map_err(|_| mismatch("binary value is not valid utf-8")),
            other => Ok(Value::Utf8(other.to_string())),
        },
    }
}
