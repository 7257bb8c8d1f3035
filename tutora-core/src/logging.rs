//! Logging for the Tutora platform, built on the `tracing` ecosystem.
//!
//! Two entry points: [`init_minimal_logging`] for tests and early startup,
//! and [`init_logging`] which honors a [`LoggingConfig`] (console layer plus
//! an optional daily-rolling file layer).

use crate::config::LoggingConfig;
use crate::error::CoreError;
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Holds the worker guard of the non-blocking file writer for the lifetime
/// of the process so buffered log lines are flushed on shutdown.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Initializes a minimal logger writing to `stderr`.
///
/// Intended for tests and for the window before configuration is loaded.
/// Filtering follows `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; repeat initializations are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

/// Builds the file layer: daily-rolling appender under the log path's parent,
/// non-blocking writer, no ANSI, text or JSON per `format`.
fn create_file_layer(
    log_path: &Path,
    format: &str,
) -> Result<(Box<dyn Layer<Registry> + Send + Sync + 'static>, WorkerGuard), CoreError> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            utils::fs::ensure_dir_exists(parent)?;
        }
    }

    let file_appender = tracing_appender::rolling::daily(
        log_path.parent().unwrap_or_else(|| Path::new(".")),
        log_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("tutora.log")),
    );
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    match format.to_lowercase().as_str() {
        "json" => {
            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking_writer)
                .with_ansi(false);
            Ok((Box::new(layer), guard))
        }
        _ => {
            let layer = fmt::layer().with_writer(non_blocking_writer).with_ansi(false);
            Ok((Box::new(layer), guard))
        }
    }
}

/// Initializes the global logging system from a [`LoggingConfig`].
///
/// Installs a console layer (ANSI only when stdout is a TTY, JSON when the
/// configured format says so) and, if `file_path` is set, a file layer whose
/// worker guard is parked in a process-wide static.
///
/// # Errors
///
/// Returns [`CoreError::LoggingInitialization`] when the level is not one of
/// the accepted names or when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        invalid => {
            return Err(CoreError::LoggingInitialization(format!(
                "Invalid log level in config: {}",
                invalid
            )));
        }
    };

    let stdout_layer = match config.format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level))
            .boxed(),
        _ => fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(EnvFilter::new(level))
            .boxed(),
    };

    let mut new_file_guard: Option<WorkerGuard> = None;
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync + 'static>> = vec![stdout_layer];
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        new_file_guard = Some(guard);
        layers.push(file_layer.with_filter(EnvFilter::new(level)).boxed());
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => {
            // Dropping a previous guard flushes its writer.
            *slot = new_file_guard;
        }
        Err(e) => {
            eprintln!(
                "[tutora-core] Failed to lock log worker guard: {}. Log flushing may be affected.",
                e
            );
        }
    }

    result.map_err(|e| {
        CoreError::LoggingInitialization(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
    })
}
