use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tablefmt::conversion::{
    self, CompositeObserver, ConversionObserver, ConversionOptions, ConversionOutcome,
    ConversionRequest, EncodingOptions, FileObserver, Operation, StdErrObserver,
};
use tablefmt::reader::CsvOptions;
use tablefmt::writer::{JsonLayout, JsonOptions, MAX_JSON_INDENT};

/// Convert tabular files between CSV, Parquet and JSON, or print a Parquet schema.
///
/// Exactly one operation runs per invocation. If several are given, the first in the order
/// --csv2parquet, --parquet2csv, --csv2json, --get-schema wins.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Convert csv to parquet (example: data.csv).
    #[arg(long, value_name = "PATH")]
    csv2parquet: Option<String>,

    /// Convert parquet to csv (example: data.parquet).
    #[arg(long, value_name = "PATH")]
    parquet2csv: Option<String>,

    /// Convert csv to json (example: data.csv).
    #[arg(long, value_name = "PATH")]
    csv2json: Option<String>,

    /// Print the schema of a parquet file (example: data.parquet).
    #[arg(long = "get-schema", visible_alias = "get_schema", value_name = "PATH")]
    get_schema: Option<String>,

    /// Output file name without extension (example: newfile).
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Field delimiter for csv files: a single ASCII character, or `\t`.
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Indent for json output, at most 16; 0 or less writes compact json.
    #[arg(
        short = 'i',
        long = "json-indent",
        visible_alias = "json_indent",
        default_value_t = 4,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(..=MAX_JSON_INDENT as i64)
    )]
    json_indent: i64,

    /// Write json as one object keyed by this column instead of an array of rows.
    #[arg(long, value_name = "COLUMN")]
    json_key: Option<String>,

    /// Read every csv column as a string instead of inferring types.
    #[arg(long, default_value_t = false)]
    no_infer: bool,

    /// Log conversion events to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Append conversion events to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// The operation to run and its input path, honoring flag precedence.
    fn selected_operation(&self) -> Option<(Operation, &str)> {
        Operation::ALL.into_iter().find_map(|op| {
            let path = match op {
                Operation::CsvToParquet => &self.csv2parquet,
                Operation::ParquetToCsv => &self.parquet2csv,
                Operation::CsvToJson => &self.csv2json,
                Operation::SchemaOf => &self.get_schema,
            };
            path.as_deref().map(|p| (op, p))
        })
    }

    fn encoding_options(&self) -> EncodingOptions {
        EncodingOptions {
            csv: CsvOptions {
                delimiter: self.delimiter,
                infer_types: !self.no_infer,
            },
            json: JsonOptions {
                indent: usize::try_from(self.json_indent).unwrap_or(0),
                layout: match &self.json_key {
                    Some(column) => JsonLayout::KeyedBy(column.clone()),
                    None => JsonLayout::Records,
                },
            },
        }
    }

    fn conversion_options(&self) -> ConversionOptions {
        let mut observers: Vec<Arc<dyn ConversionObserver>> = Vec::new();
        if self.verbose {
            observers.push(Arc::new(StdErrObserver));
        }
        if let Some(path) = &self.log_file {
            observers.push(Arc::new(FileObserver::new(path)));
        }

        ConversionOptions {
            observer: (!observers.is_empty())
                .then(|| Arc::new(CompositeObserver::new(observers)) as Arc<dyn ConversionObserver>),
            ..Default::default()
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    if s == "\\t" {
        return Ok(b'\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\n' | '\r') => Ok(c as u8),
        _ => Err(format!(
            "delimiter must be a single ASCII character other than a quote or line break, got '{s}'"
        )),
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let Some((operation, input)) = cli.selected_operation() else {
        println!(
            "Please, pass the necessary arguments for conversion (example: --csv2parquet data.csv)."
        );
        println!("Type --help for description of parameters.");
        return Ok(ExitCode::from(2));
    };

    let request = ConversionRequest::new(
        operation,
        input,
        cli.output.as_deref(),
        cli.encoding_options(),
    )?;

    match conversion::run(&request, &cli.conversion_options())? {
        ConversionOutcome::Converted {
            input,
            output,
            stats,
        } => println!(
            "Successfully converted from {} to {} in {:.3} seconds",
            input.display(),
            output.display(),
            stats.elapsed.as_secs_f64()
        ),
        ConversionOutcome::Schema { rendered, .. } => print!("{rendered}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
