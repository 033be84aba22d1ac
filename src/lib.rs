//! `tablefmt` converts tabular files between CSV, Parquet and JSON, and inspects Parquet
//! schemas.
//!
//! Every conversion goes through an in-memory [`types::Table`]: a reader loads the source file,
//! then a writer serializes the table (or [`inspect`] describes it).
//!
//! ## Formats
//!
//! - **CSV** (`.csv`): read with per-column type inference, written with a configurable
//!   delimiter
//! - **Parquet** (`.parquet`): read and written with its embedded column types
//! - **JSON** (`.json`): written as an array of row objects, or as an object keyed by a column
//!
//! ## Value types
//!
//! - [`types::DataType::Int64`] (`integer`)
//! - [`types::DataType::Float64`] (`float`)
//! - [`types::DataType::Bool`] (`boolean`)
//! - [`types::DataType::Utf8`] (`string`)
//! - [`types::DataType::Null`] (`null`, a column with no values)
//!
//! Empty CSV fields and Parquet nulls map to [`types::Value::Null`].
//!
//! ## Quick example
//!
//! ```no_run
//! use tablefmt::conversion::{ConversionRequest, EncodingOptions, Operation};
//!
//! # fn main() -> Result<(), tablefmt::TableFmtError> {
//! let request = ConversionRequest::new(
//!     Operation::CsvToJson,
//!     "people.csv",
//!     Some("people"),
//!     EncodingOptions::default(),
//! )?;
//! request.run()?; // writes people.json
//! # Ok(())
//! # }
//! ```
//!
//! Readers and writers can also be used directly:
//!
//! ```rust
//! use tablefmt::inspect::{inspect, render};
//! use tablefmt::reader::{read_csv_from_reader, CsvOptions};
//!
//! let table = read_csv_from_reader("id,name\n1,Ada\n".as_bytes(), &CsvOptions::default()).unwrap();
//! assert_eq!(render(&inspect(&table)), "id: integer\nname: string\n");
//! ```
//!
//! ## Modules
//!
//! - [`conversion`]: requests, the [`conversion::run`] entrypoint and observers
//! - [`reader`] / [`writer`]: format-specific implementations
//! - [`inspect`]: schema inspection and rendering
//! - [`filename`]: extension validation and output naming
//! - [`types`]: the table data model
//! - [`error`]: the error type shared by all of the above

pub mod conversion;
pub mod error;
pub mod filename;
pub mod inspect;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::{ErrorKind, TableFmtError, TableFmtResult};
