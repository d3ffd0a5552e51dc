//! Tracing subscriber setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Stderr, or the configured file when one is set.
    Configured,
    /// Always stderr, without colours. Stdout belongs to the summary line.
    Worker,
}

/// Install the global subscriber.
///
/// When logging to a file, the returned guard flushes pending lines on drop
/// and must be kept alive for the lifetime of the process.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened for appending.
pub fn init(
    config: &LoggingConfig,
    destination: Destination,
) -> std::io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|err| {
        eprintln!(
            "invalid log filter `{}`: {err}, falling back to `info`",
            config.filter
        );
        EnvFilter::new("info")
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (destination, config.file.as_deref()) {
        (Destination::Configured, Some(path)) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            builder.with_ansi(false).with_writer(writer).init();
            Ok(Some(guard))
        }
        (Destination::Configured, None) => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
        (Destination::Worker, _) => {
            builder.with_ansi(false).with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

/// Append-only appender writing exactly to `path`, never rotated.
fn file_appender(path: &Path) -> std::io::Result<RollingFileAppender> {
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log file `{}` has no file name", path.display()),
        )
    })?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(directory)
        .map_err(std::io::Error::other)
}
