//! Extension validation and output-name derivation.
//!
//! Everything here is pure string handling: no function touches the filesystem or prints.

use std::path::{Path, PathBuf};

use crate::error::{ExtensionErrorKind, TableFmtError, TableFmtResult};

/// Tag appended to derived output names (`data.csv` -> `data_converted.parquet`).
pub const DEFAULT_SUFFIX_TAG: &str = "converted";

/// Extension of CSV files.
pub const CSV_EXTENSION: &str = "csv";
/// Extension of Parquet files.
pub const PARQUET_EXTENSION: &str = "parquet";
/// Extension of JSON files.
pub const JSON_EXTENSION: &str = "json";

/// Whether a [`FilePath`] is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Input,
    Output,
}

/// A path together with its detected extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    raw: String,
    extension: String,
    purpose: PathPurpose,
}

impl FilePath {
    /// Wrap an output path. Output paths are not validated; the extension may be empty.
    pub fn for_output(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let extension = detect_extension(&raw).unwrap_or_default().to_string();
        Self {
            raw,
            extension,
            purpose: PathPurpose::Output,
        }
    }

    /// The path exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The path as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.raw)
    }

    /// Substring after the last `.` of the file name.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn purpose(&self) -> PathPurpose {
        self.purpose
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.raw)
    }
}

/// Validate that `path` ends in `.{expected}` (case-sensitive).
///
/// `parameter` names the CLI option the path was given for and is carried in the error.
///
/// # Examples
///
/// ```
/// use tablefmt::filename::validate_extension;
///
/// assert!(validate_extension("csv2parquet", "data.csv", "csv").is_ok());
/// assert!(validate_extension("csv2parquet", "data.parquet", "csv").is_err());
/// assert!(validate_extension("csv2parquet", "data", "csv").is_err());
/// ```
pub fn validate_extension(parameter: &str, path: &str, expected: &str) -> TableFmtResult<FilePath> {
    let fail = |kind| TableFmtError::Extension {
        parameter: parameter.to_string(),
        path: path.to_string(),
        expected: expected.to_string(),
        kind,
    };

    match detect_extension(path) {
        None => Err(fail(ExtensionErrorKind::NoExtension)),
        Some(found) if found != expected => Err(fail(ExtensionErrorKind::Mismatch {
            found: found.to_string(),
        })),
        Some(found) => Ok(FilePath {
            raw: path.to_string(),
            extension: found.to_string(),
            purpose: PathPurpose::Input,
        }),
    }
}

/// Build `<stem>_<suffix_tag>.<new_extension>` next to `input`.
///
/// The stem is the file name up to its *first* `.`, so `archive.tar.csv` becomes
/// `archive_converted.parquet`. Directory components are kept as they are.
pub fn derive_output_path(input: &str, suffix_tag: &str, new_extension: &str) -> String {
    let (dir, file_name) = split_file_name(input);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    format!("{dir}{stem}_{suffix_tag}.{new_extension}")
}

/// Use `explicit` as the output base name when given, else [`derive_output_path`].
pub fn resolve_output_path(
    explicit: Option<&str>,
    input: &str,
    suffix_tag: &str,
    extension: &str,
) -> String {
    match explicit {
        Some(base) => format!("{base}.{extension}"),
        None => derive_output_path(input, suffix_tag, extension),
    }
}

/// Splits `path` into (`directory prefix including separator`, `file name`).
fn split_file_name(path: &str) -> (&str, &str) {
    match path.rfind(std::path::is_separator) {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    }
}

fn detect_extension(path: &str) -> Option<&str> {
    let (_, file_name) = split_file_name(path);
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_matching_extension() {
        let fp = validate_extension("csv2parquet", "data.csv", "csv").unwrap();
        assert_eq!(fp.as_str(), "data.csv");
        assert_eq!(fp.extension(), "csv");
        assert_eq!(fp.purpose(), PathPurpose::Input);
    }

    #[test]
    fn uses_last_dot_for_extension() {
        assert!(validate_extension("csv2parquet", "dir/my.data.csv", "csv").is_ok());
        assert!(validate_extension("csv2parquet", "./data.csv", "csv").is_ok());
    }

    #[test]
    fn rejects_wrong_extension() {
        let err = validate_extension("csv2parquet", "data.parquet", "csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extension);
        match err {
            TableFmtError::Extension {
                parameter,
                expected,
                kind,
                ..
            } => {
                assert_eq!(parameter, "csv2parquet");
                assert_eq!(expected, "csv");
                assert_eq!(
                    kind,
                    ExtensionErrorKind::Mismatch {
                        found: "parquet".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extension_check_is_case_sensitive() {
        assert!(validate_extension("csv2json", "DATA.CSV", "csv").is_err());
    }

    #[test]
    fn rejects_missing_extension() {
        for path in ["data", "some.dir/data", ""] {
            match validate_extension("csv2parquet", path, "csv").unwrap_err() {
                TableFmtError::Extension { kind, .. } => {
                    assert_eq!(kind, ExtensionErrorKind::NoExtension, "path={path:?}")
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn derives_output_from_first_dot_of_file_name() {
        assert_eq!(
            derive_output_path("data.csv", "converted", "parquet"),
            "data_converted.parquet"
        );
        assert_eq!(
            derive_output_path("data.v2.csv", "converted", "json"),
            "data_converted.json"
        );
        assert_eq!(
            derive_output_path("in.d/data.parquet", "converted", "csv"),
            "in.d/data_converted.csv"
        );
    }

    #[test]
    fn explicit_output_wins() {
        assert_eq!(
            resolve_output_path(Some("newfile"), "data.csv", "converted", "parquet"),
            "newfile.parquet"
        );
        assert_eq!(
            resolve_output_path(None, "data.csv", "converted", "parquet"),
            "data_converted.parquet"
        );
    }

    #[test]
    fn output_paths_record_their_extension() {
        let fp = FilePath::for_output("out.json");
        assert_eq!(fp.extension(), "json");
        assert_eq!(fp.purpose(), PathPurpose::Output);
        assert_eq!(FilePath::for_output("out").extension(), "");
    }
}
