//! Writers that serialize a [`crate::types::Table`] into a target encoding.
//!
//! Every writer validates the table before the destination is created, so an invalid table
//! never produces an output file. A write that fails part-way leaves an incomplete file
//! behind; [`crate::conversion::run`] removes it when it created it.

pub mod csv;
pub mod json;
pub mod parquet;

pub use self::csv::{render_value, write_csv, write_csv_to_writer};
pub use self::json::{DEFAULT_JSON_INDENT, JsonLayout, JsonOptions, MAX_JSON_INDENT, write_json, write_json_to_writer};
pub use self::parquet::write_parquet;
