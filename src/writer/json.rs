//! JSON writer.
//!
//! Two layouts are supported:
//! - [`JsonLayout::Records`]: `[{"id":1,"name":"a"}, ...]`, one object per row
//! - [`JsonLayout::KeyedBy`]: `{"1":{"name":"a"}, ...}`, one entry per row keyed by a column

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{TableFmtError, TableFmtResult};
use crate::types::{Field, Table, Value};

use super::csv::render_value;

/// Default pretty-print indent, in spaces.
pub const DEFAULT_JSON_INDENT: usize = 4;

/// Largest accepted indent.
pub const MAX_JSON_INDENT: usize = 16;

/// Shape of the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JsonLayout {
    /// Array of row objects (default).
    #[default]
    Records,
    /// Object keyed by the text of the named column; each value is the row without that column.
    KeyedBy(String),
}

/// Options for [`write_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
    /// Spaces per nesting level, at most [`MAX_JSON_INDENT`]. `0` writes compact single-line JSON.
    pub indent: usize,
    pub layout: JsonLayout,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_JSON_INDENT,
            layout: JsonLayout::Records,
        }
    }
}

/// Write `table` as JSON to `path`.
///
/// Object keys follow column order. The table (and, for [`JsonLayout::KeyedBy`], the key
/// column) is validated before the file is created.
pub fn write_json(table: &Table, path: impl AsRef<Path>, options: &JsonOptions) -> TableFmtResult<()> {
    let document = JsonDocument::prepare(table, options)?;
    let mut out = BufWriter::new(File::create(path)?);
    document.write(&mut out, options.indent)?;
    out.flush()?;
    Ok(())
}

/// Write `table` as JSON to any byte sink.
pub fn write_json_to_writer<W: Write>(table: &Table, out: W, options: &JsonOptions) -> TableFmtResult<()> {
    JsonDocument::prepare(table, options)?.write(out, options.indent)
}

/// A validated table ready to be serialized in one of the layouts.
enum JsonDocument<'a> {
    Records(&'a Table),
    Keyed {
        table: &'a Table,
        key_idx: usize,
        keys: Vec<String>,
    },
}

impl<'a> JsonDocument<'a> {
    fn prepare(table: &'a Table, options: &JsonOptions) -> TableFmtResult<Self> {
        if options.indent > MAX_JSON_INDENT {
            return Err(TableFmtError::format(format!(
                "json indent {} exceeds the maximum of {MAX_JSON_INDENT}",
                options.indent
            )));
        }
        table.validate()?;
        match &options.layout {
            JsonLayout::Records => Ok(Self::Records(table)),
            JsonLayout::KeyedBy(column) => {
                let key_idx = table.schema.index_of(column).ok_or_else(|| {
                    TableFmtError::format(format!("json key column '{column}' does not exist"))
                })?;

                let mut seen = HashSet::with_capacity(table.row_count());
                let mut keys = Vec::with_capacity(table.row_count());
                for (idx0, value) in table.column(key_idx).enumerate() {
                    if matches!(value, Value::Null) {
                        return Err(TableFmtError::format(format!(
                            "row {} has no value in json key column '{column}'",
                            idx0 + 1
                        )));
                    }
                    let key = render_value(value);
                    if !seen.insert(key.clone()) {
                        return Err(TableFmtError::format(format!(
                            "duplicate key '{key}' in json key column '{column}'"
                        )));
                    }
                    keys.push(key);
                }
                Ok(Self::Keyed {
                    table,
                    key_idx,
                    keys,
                })
            }
        }
    }

    fn write<W: Write>(&self, out: W, indent: usize) -> TableFmtResult<()> {
        if indent == 0 {
            serde_json::to_writer(out, self)?;
        } else {
            let indent = vec![b' '; indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut ser = serde_json::Serializer::with_formatter(out, formatter);
            self.serialize(&mut ser)?;
        }
        Ok(())
    }
}

impl Serialize for JsonDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Records(table) => {
                let mut seq = serializer.serialize_seq(Some(table.row_count()))?;
                for row in &table.rows {
                    seq.serialize_element(&RowObject {
                        fields: &table.schema.fields,
                        values: row,
                        skip: None,
                    })?;
                }
                seq.end()
            }
            Self::Keyed {
                table,
                key_idx,
                keys,
            } => {
                let mut map = serializer.serialize_map(Some(keys.len()))?;
                for (key, row) in keys.iter().zip(&table.rows) {
                    map.serialize_entry(
                        key,
                        &RowObject {
                            fields: &table.schema.fields,
                            values: row,
                            skip: Some(*key_idx),
                        },
                    )?;
                }
                map.end()
            }
        }
    }
}

/// One row as a JSON object, keys in column order.
struct RowObject<'a> {
    fields: &'a [Field],
    values: &'a [Value],
    skip: Option<usize>,
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (idx, (field, value)) in self.fields.iter().zip(self.values).enumerate() {
            if Some(idx) == self.skip {
                continue;
            }
            map.serialize_entry(&field.name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonLayout, JsonOptions, write_json_to_writer};
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn people() -> Table {
        Table::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("name", DataType::Utf8),
            ]),
            vec![
                vec![Value::Int64(1), Value::Utf8("a".to_string())],
                vec![Value::Int64(2), Value::Null],
            ],
        )
    }

    fn render(table: &Table, options: &JsonOptions) -> String {
        let mut buf = Vec::new();
        write_json_to_writer(table, &mut buf, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn compact_records() {
        let options = JsonOptions {
            indent: 0,
            layout: JsonLayout::Records,
        };
        assert_eq!(
            render(&people(), &options),
            r#"[{"id":1,"name":"a"},{"id":2,"name":null}]"#
        );
    }

    #[test]
    fn keyed_layout_drops_key_column() {
        let options = JsonOptions {
            indent: 0,
            layout: JsonLayout::KeyedBy("id".to_string()),
        };
        assert_eq!(
            render(&people(), &options),
            r#"{"1":{"name":"a"},"2":{"name":null}}"#
        );
    }

    #[test]
    fn keyed_layout_rejects_missing_or_duplicate_keys() {
        let mut buf = Vec::new();
        let missing = JsonOptions {
            indent: 0,
            layout: JsonLayout::KeyedBy("nope".to_string()),
        };
        let err = write_json_to_writer(&people(), &mut buf, &missing).unwrap_err();
        assert!(err.to_string().contains("'nope' does not exist"));

        let dup = Table::new(
            Schema::new(vec![Field::new("id", DataType::Int64)]),
            vec![vec![Value::Int64(1)], vec![Value::Int64(1)]],
        );
        let options = JsonOptions {
            indent: 0,
            layout: JsonLayout::KeyedBy("id".to_string()),
        };
        let err = write_json_to_writer(&dup, &mut buf, &options).unwrap_err();
        assert!(err.to_string().contains("duplicate key '1'"));
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_indent_is_rejected_before_writing() {
        let mut buf = Vec::new();
        let options = JsonOptions {
            indent: 1_000_000_000_000,
            ..JsonOptions::default()
        };
        let err = write_json_to_writer(&people(), &mut buf, &options).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum of 16"));
        assert!(buf.is_empty());
    }
}
