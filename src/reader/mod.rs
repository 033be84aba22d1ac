//! Readers that load a source file into an in-memory [`crate::types::Table`].
//!
//! - [`csv`]: delimited text, with per-column type inference
//! - [`parquet`]: Apache Parquet, typed by the file schema
//!
//! Both fail with [`crate::error::ErrorKind::Io`] when the path cannot be opened and with
//! [`crate::error::ErrorKind::Format`] when the content is structurally invalid.

pub mod csv;
pub mod parquet;

pub use self::csv::{CsvOptions, read_csv, read_csv_from_reader};
pub use self::parquet::read_parquet;
