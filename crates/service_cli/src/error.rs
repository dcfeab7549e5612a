//! Error types for the forecast CLI.

use forecast_core::types::{ForecastError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Forecast engine error
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// Quote file not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Quote file held no usable rows
    #[error("No usable quotes: {0}")]
    NoQuotes(String),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Forecast(err.into())
    }
}

impl CliError {
    /// Create a no-quotes error
    pub fn no_quotes(msg: impl Into<String>) -> Self {
        Self::NoQuotes(msg.into())
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
