//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout the exporter.
//! Every error maps to a stable error code so embedding programs can react programmatically.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database could not be opened or reached
//! - `QueryFailed`: Query could not be executed by an adapter
//! - `Driver`: Native driver error, kept intact as the error source
//! - `Io`: Filesystem failure while writing the export
//! - `Csv`: CSV writer failure
//! - `Encoding`: A cell value has no representation in the output format
//! - `InvalidInput`: Malformed result set or missing parameters
//! - `ConfigError`: Export job file errors

use std::path::PathBuf;

use thiserror::Error;

/// Boxed driver error carried unchanged inside [`ExportError::Driver`]
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for export operations
#[derive(Error, Debug)]
pub enum ExportError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Error raised by the database driver itself
    ///
    /// The original driver error is available through `source()` and can be downcast.
    #[error("Driver error ({driver}): {source}")]
    Driver {
        driver: &'static str,
        #[source]
        source: DriverError,
    },

    /// Filesystem error while preparing or writing an export
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV writer failure
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Value could not be encoded for the output format
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid input or malformed result set
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (job file not found, invalid JSON, etc.)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ExportError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::Driver { .. } => "DRIVER_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Encoding(_) => "ENCODING_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Wrap a native driver error without altering it
    pub fn driver(driver: &'static str, source: impl Into<DriverError>) -> Self {
        Self::Driver { driver, source: source.into() }
    }

    /// Create an I/O error bound to the path being written
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;
