//! Tracing bootstrap for processes that run a startup stack.
//!
//! Install the subscriber before building the stack so the acquire and
//! release events of every unit are captured.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Minimum level logged when `RUST_LOG` is not set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-unit acquire and release events
    Trace,
    /// Per-unit acquire and release events
    Debug,
    /// Stack lifecycle events
    #[default]
    Info,
    /// Release failures
    Warn,
    /// Acquisition failures
    Error,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed
    #[error("failed to install tracing subscriber: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum log level
    pub level: LogLevel,
    /// Whether to include source location in logs
    pub include_source: bool,
    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_source: false,
            json_format: true,
        }
    }
}

impl LoggingConfig {
    /// Creates a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum log level
    #[must_use]
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enables source location in logs
    #[must_use]
    pub const fn with_source_location(mut self) -> Self {
        self.include_source = true;
        self
    }

    /// Enables plain text format instead of JSON
    #[must_use]
    pub const fn with_plain_format(mut self) -> Self {
        self.json_format = false;
        self
    }

    /// Filter from `RUST_LOG`, falling back to the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }

    /// Installs the global subscriber.
    ///
    /// Fails when a subscriber is already installed.
    pub fn init(&self) -> Result<(), LoggingError> {
        let json_layer = self.json_format.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(self.include_source)
                .with_line_number(self.include_source)
        });
        let plain_layer = (!self.json_format).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(self.include_source)
                .with_line_number(self.include_source)
        });

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(json_layer)
            .with(plain_layer)
            .try_init()?;

        tracing::info!(
            level = self.level.as_str(),
            json_format = self.json_format,
            include_source = self.include_source,
            "logging initialized"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();

        assert_eq!(config.level, LogLevel::Info);
        assert!(config.json_format);
        assert!(!config.include_source);
    }

    #[test]
    fn test_config_builder() {
        let config = LoggingConfig::new()
            .with_level(LogLevel::Debug)
            .with_source_location()
            .with_plain_format();

        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.include_source);
        assert!(!config.json_format);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_config_from_json() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{ "level": "debug", "json_format": false }"#).unwrap();

        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.json_format);
        assert!(!config.include_source);
    }
}
