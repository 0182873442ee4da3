//! Logging configuration.

use crate::config::ApplicationConfig;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};
use tracing::level_filters::LevelFilter;

/// Log level tokens accepted in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Error,
    Warn,
    Debug,
    Verbose,
    Fatal,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Log,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Debug,
        LogLevel::Verbose,
        LogLevel::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Log => "log",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Maximum tracing level emitted for this setting
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Log => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Verbose => LevelFilter::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("unknown log level: {s}"))
    }
}

/// Options for the process-wide logger
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerOptions {
    pub app_name: String,
    pub log_level: LogLevel,
    /// Log file to append to in addition to stdout. `None` disables file logging.
    pub file_path: Option<PathBuf>,
}

impl LoggerOptions {
    pub fn from_config(app_name: &str, config: &ApplicationConfig) -> Self {
        Self {
            app_name: app_name.to_string(),
            log_level: config.log_level,
            file_path: config.log_path.clone(),
        }
    }
}
