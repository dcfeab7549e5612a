//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValidationError`: malformed or out-of-range caller input
//! - `ForecastError`: every failure a forecast call can end with
//! - `ErrorKind`: a coarse tag for mapping errors onto transport status codes
//!
//! All errors are terminal for the current call. Nothing in the engine retries.

use std::fmt;
use thiserror::Error;

/// Caller input rejected before any simulation work begins.
///
/// Always recoverable by the caller correcting its input.
///
/// # Examples
/// ```
/// use forecast_core::types::ValidationError;
///
/// let err = ValidationError::DuplicateHorizon(20);
/// assert_eq!(format!("{}", err), "Duplicate horizon: 20 days requested more than once");
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Simulation count outside the accepted range.
    #[error("Invalid simulation count {count}: must be in range [{min}, {max}]")]
    SimulationCount {
        /// Requested number of simulated paths
        count: usize,
        /// Smallest accepted count
        min: usize,
        /// Largest accepted count
        max: usize,
    },

    /// Block size must be at least one return.
    #[error("Invalid block size {0}: must be >= 1")]
    BlockSize(usize),

    /// No horizons were requested.
    #[error("Horizons must be a non-empty list")]
    EmptyHorizons,

    /// The same horizon appears more than once.
    #[error("Duplicate horizon: {0} days requested more than once")]
    DuplicateHorizon(u32),

    /// Horizon is zero or exceeds the configured cap.
    #[error("Invalid horizon {horizon}: must be an integer between 1 and {max}")]
    HorizonOutOfRange {
        /// Offending horizon in days
        horizon: u32,
        /// Largest accepted horizon
        max: u32,
    },

    /// GBM mode forecasts a single horizon per call.
    #[error("GBM mode takes exactly one horizon, got {0}")]
    GbmHorizonCount(usize),

    /// Last observed price is not positive and finite.
    #[error("Invalid last close value: {0}")]
    InvalidLastPrice(f64),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },
}

/// Which series fell short of the required length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Raw closing prices as received.
    Closes,
    /// Log-returns remaining after filtering.
    LogReturns,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Closes => write!(f, "close data"),
            SeriesKind::LogReturns => write!(f, "valid log returns"),
        }
    }
}

/// Coarse error category.
///
/// The HTTP layer maps these onto status codes without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range caller input.
    Validation,
    /// Input series too short, raw or after filtering.
    InsufficientData,
    /// Every simulated path produced an invalid outcome.
    SimulationFailure,
    /// Post-aggregation sanity check failed.
    InvalidForecast,
    /// The run was cancelled between path chunks.
    Cancelled,
}

impl ErrorKind {
    /// Returns `true` when the caller can fix the failure by changing its input.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, ErrorKind::Validation | ErrorKind::InsufficientData)
    }
}

/// Failure of a single forecast call.
///
/// No partial results exist: a call yields a complete `ForecastResult` or
/// exactly one of these.
///
/// # Examples
/// ```
/// use forecast_core::types::{ErrorKind, ForecastError, ValidationError};
///
/// let err: ForecastError = ValidationError::EmptyHorizons.into();
/// assert_eq!(err.kind(), ErrorKind::Validation);
/// assert!(err.kind().is_caller_error());
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    /// Caller input rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Input series too short for the selected algorithm.
    #[error("Insufficient {series}: require at least {required}, got {actual}")]
    InsufficientData {
        /// Which series was too short
        series: SeriesKind,
        /// Minimum length required
        required: usize,
        /// Length actually available
        actual: usize,
    },

    /// Degenerate parameters: no simulated path survived.
    #[error("Simulation failed: {0}")]
    SimulationFailure(String),

    /// Aggregated bounds failed the `0 < low <= high` check.
    #[error("Invalid forecast quantiles: low = {low}, high = {high}")]
    InvalidForecast {
        /// Lower price bound
        low: f64,
        /// Upper price bound
        high: f64,
    },

    /// Cancellation was requested while paths were being simulated.
    #[error("Forecast cancelled")]
    Cancelled,
}

impl ForecastError {
    /// Create a simulation failure error
    pub fn simulation_failure(msg: impl Into<String>) -> Self {
        Self::SimulationFailure(msg.into())
    }

    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::Validation(_) => ErrorKind::Validation,
            ForecastError::InsufficientData { .. } => ErrorKind::InsufficientData,
            ForecastError::SimulationFailure(_) => ErrorKind::SimulationFailure,
            ForecastError::InvalidForecast { .. } => ErrorKind::InvalidForecast,
            ForecastError::Cancelled => ErrorKind::Cancelled,
        }
    }
}
