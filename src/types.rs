//! Core data model: the in-memory [`Table`] every reader produces and every writer consumes.
//!
//! A table is a [`Schema`] (an ordered list of uniquely named, typed [`Field`]s) plus
//! row-major [`Value`] storage.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{TableFmtError, TableFmtResult};

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Column whose every value is missing.
    Null,
}

impl DataType {
    /// Human-readable spelling used by [`crate::inspect::render`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Int64 => "integer",
            Self::Float64 => "float",
            Self::Bool => "boolean",
            Self::Utf8 => "string",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered column metadata of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fails on the first repeated column name.
    pub fn check_unique_names(&self) -> TableFmtResult<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for name in self.field_names() {
            if !seen.insert(name) {
                return Err(TableFmtError::format(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        Ok(())
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// True when this value may be stored in a column of `data_type`.
    pub fn fits(&self, data_type: DataType) -> bool {
        matches!(
            (self, data_type),
            (Value::Null, _)
                | (Value::Int64(_), DataType::Int64)
                | (Value::Float64(_), DataType::Float64)
                | (Value::Bool(_), DataType::Bool)
                | (Value::Utf8(_), DataType::Utf8)
        )
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int64(v) => serializer.serialize_i64(*v),
            // serde_json writes non-finite floats as `null`.
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Utf8(v) => serializer.serialize_str(v),
        }
    }
}

/// In-memory tabular data.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Tables are
/// never mutated after construction; readers build them, writers borrow them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows without checking invariants.
    ///
    /// Use [`Table::try_new`] or [`Table::validate`] when the rows come from an untrusted source.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Create a table, failing if it violates any invariant checked by [`Table::validate`].
    pub fn try_new(schema: Schema, rows: Vec<Vec<Value>>) -> TableFmtResult<Self> {
        let table = Self::new(schema, rows);
        table.validate()?;
        Ok(table)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Iterate the values of column `idx`, top to bottom.
    ///
    /// Rows are assumed to satisfy [`Table::validate`]; short rows yield [`Value::Null`].
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }

    /// Check the table invariants:
    ///
    /// - column names are unique
    /// - every row has exactly one value per column
    /// - every non-null value matches its column type
    pub fn validate(&self) -> TableFmtResult<()> {
        self.schema.check_unique_names()?;

        let width = self.schema.len();
        for (idx0, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(TableFmtError::format(format!(
                    "row {} has {} values but the table has {width} columns",
                    idx0 + 1,
                    row.len()
                )));
            }
            for (field, value) in self.schema.fields.iter().zip(row) {
                if !value.fits(field.data_type) {
                    return Err(TableFmtError::format(format!(
                        "row {} column '{}': value {value:?} does not fit type {}",
                        idx0 + 1,
                        field.name,
                        field.data_type
                    )));
                }
            }
        }
        Ok(())
    }
}
