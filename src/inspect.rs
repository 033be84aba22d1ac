//! Schema inspection: column names and types of a loaded [`Table`].

use std::fmt::Write as _;

use crate::types::{Schema, Table};

/// Column (name, type) pairs of `table`, in column order.
pub fn inspect(table: &Table) -> Schema {
    table.schema.clone()
}

/// One `name: type` line per column, each terminated by `\n`.
///
/// Type names are those of [`crate::types::DataType::name`]: `integer`, `float`, `boolean`,
/// `string` and `null`.
pub fn render(schema: &Schema) -> String {
    let mut out = String::new();
    for field in &schema.fields {
        let _ = writeln!(out, "{}: {}", field.name, field.data_type);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{inspect, render};
    use crate::types::{DataType, Field, Schema, Table, Value};

    #[test]
    fn renders_one_line_per_column() {
        let table = Table::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("name", DataType::Utf8),
            ]),
            vec![vec![Value::Int64(1), Value::Utf8("a".to_string())]],
        );
        assert_eq!(render(&inspect(&table)), "id: integer\nname: string\n");
    }

    #[test]
    fn empty_schema_renders_empty_string() {
        assert_eq!(render(&Schema::new(vec![])), "");
    }

    #[test]
    fn inspect_preserves_column_order() {
        let schema = Schema::new(vec![
            Field::new("z", DataType::Bool),
            Field::new("a", DataType::Float64),
            Field::new("m", DataType::Null),
        ]);
        let table = Table::new(schema.clone(), vec![]);
        assert_eq!(inspect(&table), schema);
        assert_eq!(render(&schema), "z: boolean\na: float\nm: null\n");
    }
}
