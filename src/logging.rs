//! Structured logging setup
//!
//! Library code logs through `tracing` with structured fields
//! (`worker_id`, `request_id`, `scenario`, `error`). This module installs the
//! process-wide subscriber once, choosing level and format from the
//! application configuration:
//! - default: WARN, human-readable console output
//! - `--verbose`: INFO
//! - `--debug`: DEBUG with targets and thread ids
//! - `RUST_LOG` overrides the level filter entirely
//!
//! Logs go to stderr so the scenario reports on stdout stay clean.

use crate::{
    error::{AppError, Result},
    models::AppConfig,
};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    #[default]
    Console,
    /// JSON format for log aggregators
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" | "pretty" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::config(format!("Invalid log format: {}", s))),
        }
    }
}

/// Resolved logging settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub use_color: bool,
    pub include_location: bool,
}

impl LoggingConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let level = if config.debug {
            Level::DEBUG
        } else if config.verbose {
            Level::INFO
        } else {
            Level::WARN
        };

        Self {
            level,
            format: config.log_format,
            use_color: config.enable_color,
            include_location: config.debug,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
    }
}

/// Install the global subscriber. A second call (common in tests) is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(config.use_color)
        .with_target(config.include_location)
        .with_thread_ids(config.include_location);

    let installed = match config.format {
        LogFormat::Console => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping existing one");
    }
}
