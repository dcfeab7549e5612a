//! Series, result, and error types.
//!
//! This module provides:
//! - `series`: [`PriceSeries`] and the derived [`LogReturnSeries`]
//! - `result`: per-horizon and aggregate forecast outputs
//! - `error`: structured error types for validation and simulation failures
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod error;
pub mod result;
pub mod series;

pub use error::{ErrorKind, ForecastError, SeriesKind, ValidationError};
pub use result::{
    EstimationMethod, ForecastResult, GbmCalibration, HorizonResult, PriceBand, ScenarioLabel,
    SimulationDiagnostics,
};
pub use series::{is_finite_positive, LogReturnSeries, PriceSeries};
