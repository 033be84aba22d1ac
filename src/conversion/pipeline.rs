//! One conversion, end to end: validate paths, read, then write or inspect.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{TableFmtError, TableFmtResult};
use crate::filename::{
    CSV_EXTENSION, DEFAULT_SUFFIX_TAG, FilePath, JSON_EXTENSION, PARQUET_EXTENSION,
    resolve_output_path, validate_extension,
};
use crate::inspect::{inspect, render};
use crate::reader::{CsvOptions, read_csv, read_parquet};
use crate::types::{Schema, Table};
use crate::writer::{JsonOptions, write_csv, write_json, write_parquet};

use super::observability::{ConversionContext, ConversionObserver, ConversionSeverity, ConversionStats};

/// The operations a [`ConversionRequest`] can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CsvToParquet,
    ParquetToCsv,
    CsvToJson,
    /// Print the schema of a Parquet file.
    SchemaOf,
}

impl Operation {
    /// All operations, in the order the command line honors them.
    pub const ALL: [Operation; 4] = [
        Operation::CsvToParquet,
        Operation::ParquetToCsv,
        Operation::CsvToJson,
        Operation::SchemaOf,
    ];

    /// Name of the command-line option selecting this operation.
    pub fn parameter(self) -> &'static str {
        match self {
            Self::CsvToParquet => "csv2parquet",
            Self::ParquetToCsv => "parquet2csv",
            Self::CsvToJson => "csv2json",
            Self::SchemaOf => "get-schema",
        }
    }

    /// Extension the input path must carry.
    pub fn input_extension(self) -> &'static str {
        match self {
            Self::CsvToParquet | Self::CsvToJson => CSV_EXTENSION,
            Self::ParquetToCsv | Self::SchemaOf => PARQUET_EXTENSION,
        }
    }

    /// Extension of the produced file, if any.
    pub fn output_extension(self) -> Option<&'static str> {
        match self {
            Self::CsvToParquet => Some(PARQUET_EXTENSION),
            Self::ParquetToCsv => Some(CSV_EXTENSION),
            Self::CsvToJson => Some(JSON_EXTENSION),
            Self::SchemaOf => None,
        }
    }
}

/// Encoding options carried by a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodingOptions {
    /// Delimiter and inference settings for CSV input and output.
    pub csv: CsvOptions,
    /// Indent and layout for JSON output.
    pub json: JsonOptions,
}

/// A single, validated conversion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    operation: Operation,
    input: FilePath,
    output: Option<FilePath>,
    options: EncodingOptions,
}

impl ConversionRequest {
    /// Validate `input` for `operation` and resolve the output path.
    ///
    /// `explicit_output` is a base name without extension; when absent the output name is
    /// derived from the input (`data.csv` -> `data_converted.parquet`). Schema inspection has no
    /// output and ignores `explicit_output`.
    pub fn new(
        operation: Operation,
        input: &str,
        explicit_output: Option<&str>,
        options: EncodingOptions,
    ) -> TableFmtResult<Self> {
        let input = validate_extension(operation.parameter(), input, operation.input_extension())?;
        let output = operation.output_extension().map(|ext| {
            FilePath::for_output(resolve_output_path(
                explicit_output,
                input.as_str(),
                DEFAULT_SUFFIX_TAG,
                ext,
            ))
        });
        Ok(Self {
            operation,
            input,
            output,
            options,
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn input(&self) -> &FilePath {
        &self.input
    }

    /// Destination path; `None` for [`Operation::SchemaOf`].
    pub fn output(&self) -> Option<&FilePath> {
        self.output.as_ref()
    }

    pub fn options(&self) -> &EncodingOptions {
        &self.options
    }

    /// Execute the request with default [`ConversionOptions`].
    pub fn run(&self) -> TableFmtResult<ConversionOutcome> {
        run(self, &ConversionOptions::default())
    }
}

/// Options controlling how [`run`] reports its outcome.
#[derive(Clone)]
pub struct ConversionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

/// What a successful [`run`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// A file was written.
    Converted {
        input: PathBuf,
        output: PathBuf,
        stats: ConversionStats,
    },
    /// The schema of the input was computed.
    Schema {
        schema: Schema,
        /// [`render`]ed form of `schema`.
        rendered: String,
        stats: ConversionStats,
    },
}

impl ConversionOutcome {
    pub fn stats(&self) -> ConversionStats {
        match self {
            Self::Converted { stats, .. } | Self::Schema { stats, .. } => *stats,
        }
    }
}

/// Execute one conversion.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts and elapsed time
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// Errors are always returned to the caller; the observer only sees a copy of the event.
/// If writing fails part-way, an output file created by this run is removed (best effort); a
/// file that already existed at the output path is left truncated and must not be trusted.
///
/// # Examples
///
/// ```no_run
/// use tablefmt::conversion::{ConversionOptions, ConversionRequest, EncodingOptions, Operation, run};
///
/// # fn main() -> Result<(), tablefmt::TableFmtError> {
/// let request = ConversionRequest::new(
///     Operation::CsvToParquet,
///     "data.csv",
///     None,
///     EncodingOptions::default(),
/// )?;
/// // Writes data_converted.parquet.
/// let outcome = run(&request, &ConversionOptions::default())?;
/// println!("rows={}", outcome.stats().rows);
/// # Ok(())
/// # }
/// ```
pub fn run(request: &ConversionRequest, options: &ConversionOptions) -> TableFmtResult<ConversionOutcome> {
    let ctx = ConversionContext {
        operation: request.operation,
        input: request.input.to_path_buf(),
        output: request.output.as_ref().map(FilePath::to_path_buf),
    };

    let result = execute(request);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(outcome) => obs.on_success(&ctx, outcome.stats()),
            Err(e) => {
                let sev = ConversionSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn execute(request: &ConversionRequest) -> TableFmtResult<ConversionOutcome> {
    let started = Instant::now();
    let input = request.input.as_path();

    let table = match request.operation {
        Operation::CsvToParquet | Operation::CsvToJson => read_csv(input, &request.options.csv)?,
        Operation::ParquetToCsv | Operation::SchemaOf => read_parquet(input)?,
    };

    let stats = |table: &Table| ConversionStats {
        rows: table.row_count(),
        columns: table.column_count(),
        elapsed: started.elapsed(),
    };

    if request.operation == Operation::SchemaOf {
        let schema = inspect(&table);
        let rendered = render(&schema);
        return Ok(ConversionOutcome::Schema {
            schema,
            rendered,
            stats: stats(&table),
        });
    }

    let Some(output) = request.output.as_ref() else {
        return Err(TableFmtError::format(format!(
            "--{} requires an output path",
            request.operation.parameter()
        )));
    };

    // Writers validate the table before creating the destination.
    let dest = output.as_path();
    write_with_cleanup(dest, || match request.operation {
        Operation::CsvToParquet => write_parquet(&table, dest),
        Operation::ParquetToCsv => write_csv(&table, dest, request.options.csv.delimiter),
        Operation::CsvToJson => write_json(&table, dest, &request.options.json),
        Operation::SchemaOf => Ok(()),
    })?;

    Ok(ConversionOutcome::Converted {
        input: request.input.to_path_buf(),
        output: output.to_path_buf(),
        stats: stats(&table),
    })
}

/// Run `write`, removing `dest` on failure unless it existed before the call.
fn write_with_cleanup(
    dest: &Path,
    write: impl FnOnce() -> TableFmtResult<()>,
) -> TableFmtResult<()> {
    let existed = dest.exists();
    write().inspect_err(|_| {
        if !existed {
            let _ = std::fs::remove_file(dest);
        }
    })
}
