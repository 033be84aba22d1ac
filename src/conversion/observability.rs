use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{ErrorKind, TableFmtError};

use super::pipeline::Operation;

/// How bad a failed conversion is. Ordered, so it can serve as an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConversionSeverity {
    /// Bad arguments or unreadable content.
    Error,
    /// The filesystem failed underneath us.
    Critical,
}

impl ConversionSeverity {
    /// Severity of a failed conversion.
    pub fn for_error(error: &TableFmtError) -> Self {
        match error.kind() {
            ErrorKind::Io => Self::Critical,
            ErrorKind::Extension | ErrorKind::Format => Self::Error,
        }
    }
}

/// Context about one conversion attempt.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    pub operation: Operation,
    /// Source file.
    pub input: PathBuf,
    /// Destination file; `None` for schema inspection.
    pub output: Option<PathBuf>,
}

impl fmt::Display for ConversionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op={:?} input={}", self.operation, self.input.display())?;
        match &self.output {
            Some(out) => write!(f, " output={}", out.display()),
            None => f.write_str(" output=-"),
        }
    }
}

/// Stats reported on a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionStats {
    /// Rows read from the source.
    pub rows: usize,
    /// Columns read from the source.
    pub columns: usize,
    /// Wall-clock time spent reading and writing.
    pub elapsed: Duration,
}

/// Observer interface for conversion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ConversionObserver: Send + Sync {
    /// Called when a conversion succeeds.
    fn on_success(&self, _ctx: &ConversionContext, _stats: ConversionStats) {}

    /// Called when a conversion fails.
    fn on_failure(&self, _ctx: &ConversionContext, _severity: ConversionSeverity, _error: &TableFmtError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ConversionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ConversionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ConversionObserver for CompositeObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs conversion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ConversionObserver for StdErrObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        eprintln!("[convert][ok] {ctx} {}", StatsLine(stats));
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        eprintln!("[convert][{severity:?}] {ctx} err={error}");
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        eprintln!("[ALERT][convert][{severity:?}] {ctx} err={error}");
    }
}

/// Appends one line per conversion event to a local log file, prefixed with a unix timestamp.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Log to `path`, creating it on first use. Open or write failures are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: fmt::Arguments<'_>) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {event}", unix_ts());
        }
    }
}

impl ConversionObserver for FileObserver {
    fn on_success(&self, ctx: &ConversionContext, stats: ConversionStats) {
        self.append(format_args!("ok {ctx} {}", StatsLine(stats)));
    }

    fn on_failure(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        self.append(format_args!("fail severity={severity:?} {ctx} err={error}"));
    }

    fn on_alert(&self, ctx: &ConversionContext, severity: ConversionSeverity, error: &TableFmtError) {
        self.append(format_args!("ALERT severity={severity:?} {ctx} err={error}"));
    }
}

struct StatsLine(ConversionStats);

impl fmt::Display for StatsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} columns={} elapsed_ms={}",
            self.0.rows,
            self.0.columns,
            self.0.elapsed.as_millis()
        )
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
