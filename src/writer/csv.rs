//! CSV writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::TableFmtResult;
use crate::types::{Table, Value};

/// Write `table` as CSV to `path`, separating fields with `delimiter`.
///
/// The table is validated before the file is created. Fields are quoted only when they
/// contain the delimiter, a quote or a line break, so the output reads back with
/// [`crate::reader::read_csv`] under the same delimiter.
pub fn write_csv(table: &Table, path: impl AsRef<Path>, delimiter: u8) -> TableFmtResult<()> {
    table.validate()?;
    let file = File::create(path)?;
    write_csv_unchecked(table, file, delimiter)
}

/// Write `table` as CSV to any byte sink.
pub fn write_csv_to_writer<W: Write>(table: &Table, out: W, delimiter: u8) -> TableFmtResult<()> {
    table.validate()?;
    write_csv_unchecked(table, out, delimiter)
}

fn write_csv_unchecked<W: Write>(table: &Table, out: W, delimiter: u8) -> TableFmtResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    wtr.write_record(table.schema.field_names())?;
    let mut record: Vec<String> = Vec::with_capacity(table.column_count());
    for row in &table.rows {
        record.clear();
        record.extend(row.iter().map(render_value));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Text form of a single value.
///
/// Integral floats keep a trailing `.0` so the column is read back as float, not integer.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Value::Float64(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Utf8(v) => v.clone(),
    }
}
