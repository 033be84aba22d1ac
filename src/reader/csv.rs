//! CSV reader with per-column type inference.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{TableFmtError, TableFmtResult};
use crate::types::{DataType, Field, Schema, Table, Value};

/// Options for reading (and writing) delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field separator byte. Defaults to `,`.
    pub delimiter: u8,
    /// Infer integer/float/boolean columns. When `false`, every column is read as a string.
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Default options with a different delimiter.
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

/// Read a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first row is the header and names the columns.
/// - Empty fields, and fields missing at the end of a short row, become [`Value::Null`].
/// - A row with more fields than the header is an error.
/// - Column types are inferred from all rows (integer, then float, then boolean, else string)
///   unless [`CsvOptions::infer_types`] is off.
pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> TableFmtResult<Table> {
    let file = File::open(path)?;
    read_csv_from_reader(file, options)
}

/// Read CSV data from any byte source.
pub fn read_csv_from_reader<R: Read>(input: R, options: &CsvOptions) -> TableFmtResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(input);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(TableFmtError::format("no columns to parse from csv input"));
    }
    let width = headers.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(TableFmtError::format(format!(
                "line {line}: expected {width} fields, saw {}",
                record.len()
            )));
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|raw| (!raw.is_empty()).then(|| raw.to_owned()))
            .collect();
        row.resize(width, None);
        raw_rows.push(row);
    }

    let mut fields = Vec::with_capacity(width);
    for (idx, name) in headers.iter().enumerate() {
        let data_type = if options.infer_types {
            infer_column_type(raw_rows.iter().filter_map(|row| row[idx].as_deref()))
        } else {
            DataType::Utf8
        };
        fields.push(Field::new(name, data_type));
    }
    let schema = Schema::new(fields);
    schema.check_unique_names()?;

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (idx0, raw_row) in raw_rows.into_iter().enumerate() {
        // 1-based data row; +1 again for the header line.
        let user_row = idx0 + 2;
        let mut row = Vec::with_capacity(width);
        for (field, raw) in schema.fields.iter().zip(raw_row) {
            row.push(match raw {
                None => Value::Null,
                Some(raw) => parse_typed_value(user_row, field, raw)?,
            });
        }
        rows.push(row);
    }

    Ok(Table::new(schema, rows))
}

/// Pick the narrowest type every value of a column parses as.
///
/// Tries integer, then float, then boolean, and falls back to string. A column with no
/// values at all is [`DataType::Null`].
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a str>) -> DataType {
    let mut any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for raw in values {
        any = true;
        let trimmed = raw.trim();
        all_int = all_int && trimmed.parse::<i64>().is_ok();
        all_float = all_float && parse_float(trimmed).is_some();
        all_bool = all_bool && parse_bool(trimmed).is_some();
        if !(all_int || all_float || all_bool) {
            return DataType::Utf8;
        }
    }

    if !any {
        DataType::Null
    } else if all_int {
        DataType::Int64
    } else if all_float {
        DataType::Float64
    } else if all_bool {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

fn parse_typed_value(row: usize, field: &Field, raw: String) -> TableFmtResult<Value> {
    let trimmed = raw.trim();
    let parsed = match field.data_type {
        DataType::Utf8 => return Ok(Value::Utf8(raw)),
        DataType::Null => None,
        DataType::Int64 => trimmed.parse::<i64>().ok().map(Value::Int64),
        DataType::Float64 => parse_float(trimmed).map(Value::Float64),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool),
    };
    parsed.ok_or_else(|| {
        TableFmtError::format(format!(
            "row {row} column '{}': cannot read '{raw}' as {}",
            field.name, field.data_type
        ))
    })
}

/// Decimal or scientific notation only. Words like `nan` or `Infinity` stay text.
fn parse_float(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
