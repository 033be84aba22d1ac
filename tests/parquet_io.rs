use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use tablefmt::ErrorKind;
use tablefmt::reader::read_parquet;
use tablefmt::types::{DataType, Field, Schema, Table, Value};
use tablefmt::writer::write_parquet;

fn mixed_table() -> Table {
    Table::try_new(
        Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
            Field::new("active", DataType::Bool),
            Field::new("empty", DataType::Null),
        ]),
        vec![
            vec![
                Value::Int64(1),
                Value::Utf8("Ada".to_string()),
                Value::Float64(98.5),
                Value::Bool(true),
                Value::Null,
            ],
            vec![
                Value::Int64(-2),
                Value::Null,
                Value::Float64(-0.125),
                Value::Null,
                Value::Null,
            ],
            vec![
                Value::Null,
                Value::Utf8("".to_string()),
                Value::Null,
                Value::Bool(false),
                Value::Null,
            ],
        ],
    )
    .unwrap()
}

/// Writes a file the way other producers do: REQUIRED columns and narrower physical types.
fn write_required_people(path: &Path) {
    let schema_str = r#"
    message schema {
      REQUIRED INT32 id;
      REQUIRED BINARY name (UTF8);
      REQUIRED FLOAT score;
      REQUIRED BOOLEAN active;
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::Int32ColumnWriter(w) => {
                w.write_batch(&[1_i32, 2_i32], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let v1 = ByteArray::from("Ada");
                let v2 = ByteArray::from("Grace");
                w.write_batch(&[v1, v2], None, None).unwrap();
            }
            ColumnWriter::FloatColumnWriter(w) => {
                w.write_batch(&[98.5_f32, 87.25_f32], None, None).unwrap();
            }
            ColumnWriter::BoolColumnWriter(w) => {
                w.write_batch(&[true, false], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_round_trip_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.parquet");
    let table = mixed_table();

    write_parquet(&table, &path).unwrap();
    let back = read_parquet(&path).unwrap();

    assert_eq!(back, table);
}

#[test]
fn empty_table_keeps_its_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.parquet");
    let table = Table::new(mixed_table().schema, vec![]);

    write_parquet(&table, &path).unwrap();
    let back = read_parquet(&path).unwrap();

    assert_eq!(back.schema, table.schema);
    assert_eq!(back.row_count(), 0);
}

#[test]
fn reads_required_and_narrow_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.parquet");
    write_required_people(&path);

    let table = read_parquet(&path).unwrap();
    assert_eq!(
        table.schema,
        Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("name", DataType::Utf8),
            Field::new("score", DataType::Float64),
            Field::new("active", DataType::Bool),
        ])
    );
    assert_eq!(
        table.rows[1],
        vec![
            Value::Int64(2),
            Value::Utf8("Grace".to_string()),
            Value::Float64(87.25),
            Value::Bool(false),
        ]
    );
}

#[test]
fn nested_schemas_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested.parquet");
    let schema = Arc::new(
        parse_message_type(
            r#"
            message schema {
              REQUIRED group point {
                REQUIRED INT32 x;
                REQUIRED INT32 y;
              }
            }
            "#,
        )
        .unwrap(),
    );
    let props = Arc::new(WriterProperties::builder().build());
    let writer = SerializedFileWriter::new(File::create(&path).unwrap(), schema, props).unwrap();
    writer.close().unwrap();

    let err = read_parquet(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("only flat schemas"));
}

#[test]
fn corrupt_file_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.parquet");
    std::fs::write(&path, b"this is not a parquet file at all").unwrap();

    let err = read_parquet(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn missing_file_is_io_error() {
    let err = read_parquet("tests/fixtures/does_not_exist.parquet").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn writer_validates_before_creating_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.parquet");
    let table = Table::new(
        Schema::new(vec![Field::new("id", DataType::Int64)]),
        vec![vec![Value::Utf8("one".to_string())]],
    );

    let err = write_parquet(&table, &path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(!path.exists());
}
