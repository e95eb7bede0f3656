//! Logging configuration and operation reporting

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// General information
    Info,
    /// Debug information
    Debug,
    /// Very verbose debug information
    Trace,
}

impl LogLevel {
    /// Parse a level name (case-insensitive)
    pub fn parse(level: &str) -> Result<Self, DomainError> {
        match level.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(DomainError::Config(format!(
                "Invalid log level: {}. Valid options: error, warn, info, debug, trace",
                other
            ))),
        }
    }

    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Debug and trace runs get timestamps and targets
    pub fn is_verbose(&self) -> bool {
        matches!(self, LogLevel::Debug | LogLevel::Trace)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(DomainError::Config(format!(
                "Invalid log format: {}. Valid options: text, json",
                other
            ))),
        }
    }
}

/// Logging configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    /// Create a new logging system with configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Install the global subscriber. `RUST_LOG` wins over the configured level.
    pub fn initialize(&self) -> Result<(), DomainError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_filter()));
        let verbose = self.config.level.is_verbose();

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        let result = match self.config.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Text if verbose => builder.with_target(true).try_init(),
            LogFormat::Text => builder.without_time().with_target(false).compact().try_init(),
        };
        result.map_err(|e| DomainError::Config(format!("Failed to initialize logging: {}", e)))?;

        tracing::debug!(
            "Logging system initialized with level: {:?}",
            self.config.level
        );
        Ok(())
    }
}

/// STARTING / PASSED / FAILED lines around a long-running operation
pub struct OperationReporter {
    topic: String,
    start_time: Instant,
}

impl OperationReporter {
    /// Start a new operation
    pub fn start(topic: impl Into<String>) -> Self {
        let topic = topic.into();
        tracing::info!("{} - STARTING", topic);
        Self {
            topic,
            start_time: Instant::now(),
        }
    }

    /// Log a step within the operation
    pub fn step(&self, description: &str) {
        tracing::info!("{} - {}", self.topic, description);
    }

    /// Complete the operation
    pub fn passed(self) {
        tracing::info!(
            "{} - PASSED in {:.2}s",
            self.topic,
            self.start_time.elapsed().as_secs_f64()
        );
    }

    /// Report a failure
    pub fn failed(self, error: &dyn std::fmt::Display) {
        tracing::error!("{} - FAILED: {}", self.topic, error);
    }
}
