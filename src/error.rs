use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Convenience result type for reading, writing and converting tables.
pub type TableFmtResult<T> = Result<T, TableFmtError>;

/// Why an input path was rejected by [`crate::filename::validate_extension`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionErrorKind {
    /// The path has an extension, but not the expected one.
    Mismatch {
        /// Extension actually found after the last `.`.
        found: String,
    },
    /// The path contains no `.` in its file name.
    NoExtension,
}

impl fmt::Display for ExtensionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { found } => write!(f, "found extension '.{found}'"),
            Self::NoExtension => f.write_str("path has no extension"),
        }
    }
}

/// Coarse error classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong or missing file suffix for the requested operation.
    Extension,
    /// A path could not be opened, read, created or written.
    Io,
    /// Content does not parse as the declared format, or a table violates its invariants.
    Format,
}

/// Error type returned by every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum TableFmtError {
    /// The path given for `--{parameter}` does not end in `.{expected}`.
    #[error(
        "wrong argument for --{parameter}: you must specify a *.{expected} file ({kind}: '{path}')"
    )]
    Extension {
        parameter: String,
        path: String,
        expected: String,
        kind: ExtensionErrorKind,
    },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet read/write error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content or the in-memory table is structurally invalid.
    #[error("format error: {message}")]
    Format { message: String },
}

impl TableFmtError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Collapse this error onto one of the three [`ErrorKind`]s.
    ///
    /// Library errors whose root cause is an I/O failure classify as [`ErrorKind::Io`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extension { .. } => ErrorKind::Extension,
            Self::Io(_) => ErrorKind::Io,
            Self::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Format,
            },
            Self::Parquet(err) => {
                if error_chain_contains_io(err) {
                    ErrorKind::Io
                } else {
                    ErrorKind::Format
                }
            }
            Self::Json(err) if err.is_io() => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Format,
            Self::Format { .. } => ErrorKind::Format,
        }
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}
