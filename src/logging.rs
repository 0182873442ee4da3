//! Process-wide structured logging.
//!
//! Every event is written as one JSON object per line to stdout. When a log
//! file is configured the same stream is appended to it through a
//! non-blocking writer; the returned [`WorkerGuard`] must outlive the server
//! so buffered lines are flushed on shutdown.

use crate::config::LoggerOptions;
use std::{fs, path::Path};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Log path {0} does not name a file")]
    InvalidPath(String),

    #[error("Failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file: {0}")]
    FileAppender(#[from] InitError),

    #[error("Failed to install global subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init(options: &LoggerOptions) -> Result<Option<WorkerGuard>, LoggingError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(options.log_level.level_filter().into())
        .from_env_lossy();

    let mut layers = vec![layer().json().boxed()];

    let guard = match &options.file_path {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            layers.push(layer().json().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

    tracing::info!(
        app = %options.app_name,
        level = %options.log_level,
        file = ?options.file_path,
        "Logger initialized"
    );

    Ok(guard)
}

/// Open `path` for appending behind a background writer thread.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDirectory {
        path: dir.display().to_string(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;

    Ok(tracing_appender::non_blocking(appender))
}
