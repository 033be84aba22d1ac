//! Conversion entrypoints.
//!
//! Most callers build a [`ConversionRequest`] and pass it to [`run`], which:
//!
//! - reads the input (CSV or Parquet) into an in-memory [`crate::types::Table`]
//! - writes the table in the target format, or computes its schema
//! - optionally reports success/failure/alerts to a [`ConversionObserver`]

pub mod observability;
pub mod pipeline;

pub use observability::{
    CompositeObserver, ConversionContext, ConversionObserver, ConversionSeverity, ConversionStats,
    FileObserver, StdErrObserver,
};
pub use pipeline::{
    ConversionOptions, ConversionOutcome, ConversionRequest, EncodingOptions, Operation, run,
};
