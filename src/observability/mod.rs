//! Observability: structured logging via `tracing`.
//!
//! Metrics are recorded through the `metrics` facade; no exporter is
//! installed here, so they are dropped unless the embedding process sets a
//! recorder.

mod logging;

pub use logging::{LOG_FILE_ENV, LOG_FILTER_ENV, LOG_FORMAT_ENV, LogFormat, LoggingConfig};

use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static LOGGING_READY: OnceLock<()> = OnceLock::new();

/// Installs the global tracing subscriber.
///
/// Logs go to stderr unless a file is configured, so report output on
/// stdout stays clean.
///
/// # Errors
///
/// Returns an error if logging was already initialized, the filter
/// directive is invalid, or the log file cannot be opened.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if LOGGING_READY.get().is_some() {
        return Err(setup_failed("logging already initialized"));
    }

    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| setup_failed(format!("invalid log filter '{}': {e}", config.filter)))?;

    match (&config.file, config.format) {
        (Some(log_file), LogFormat::Json) => {
            let writer = RunLog::open(log_file)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(setup_failed)?;
        },
        (Some(log_file), LogFormat::Pretty) => {
            let writer = RunLog::open(log_file)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(setup_failed)?;
        },
        (None, LogFormat::Json) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true),
                )
                .with(filter)
                .try_init()
                .map_err(setup_failed)?;
        },
        (None, LogFormat::Pretty) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false),
                )
                .with(filter)
                .try_init()
                .map_err(setup_failed)?;
        },
    }

    LOGGING_READY
        .set(())
        .map_err(|()| setup_failed("logging initialized concurrently"))
}

/// Append-only run log shared by every event the subscriber writes.
///
/// Scheduled runs reuse one file, so it is never truncated.
#[derive(Clone)]
struct RunLog {
    path: Arc<PathBuf>,
    file: Arc<Mutex<File>>,
}

impl RunLog {
    fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "open_run_log".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::OperationFailed {
                operation: "open_run_log".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Ok(Self {
            path: Arc::new(path.to_path_buf()),
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn locked(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other(format!("run log {} poisoned", self.path.display())))
    }
}

impl Write for RunLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.locked()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.locked()?.flush()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for RunLog {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[allow(clippy::needless_pass_by_value)]
fn setup_failed(cause: impl std::fmt::Display) -> Error {
    Error::OperationFailed {
        operation: "logging_setup".to_string(),
        cause: cause.to_string(),
    }
}
