//! # forecast_core: Foundation Layer for the Monte Carlo Forecaster
//!
//! ## Layer 1 (Foundation) Role
//!
//! forecast_core is the bottom layer of the workspace, providing:
//! - Price and log-return series types (`types::series`)
//! - Forecast result types: `HorizonResult`, `ForecastResult`, `ScenarioLabel` (`types::result`)
//! - Error types: `ValidationError`, `ForecastError` (`types::error`)
//! - Order statistics and sample moments (`math`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal external dependencies:
//! - chrono: `as_of` timestamps on results
//! - thiserror: error derivation
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use forecast_core::math::{median, quantile};
//! use forecast_core::types::{LogReturnSeries, PriceSeries};
//!
//! let prices = PriceSeries::new(vec![100.0, 101.0, 99.5, 102.0]);
//! let returns = LogReturnSeries::from_prices(&prices);
//! assert_eq!(returns.len(), 3);
//! assert_eq!(returns.dropped(), 0);
//!
//! let sample = [3.0, 1.0, 2.0];
//! assert_eq!(quantile(&sample, 0.0), 1.0);
//! assert_eq!(median(&sample), 2.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for result types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
