//! # forecast_engine: Monte Carlo Simulation Layer
//!
//! ## Layer 2 (Simulation) Role
//!
//! forecast_engine turns a close history into a probabilistic short-horizon
//! outlook, providing:
//! - Seeded random number generation with per-worker streams (`rng`)
//! - Simulation configuration, GBM and block-bootstrap path generators,
//!   chunked parallel execution and cancellation (`mc`)
//! - Scenario classification (`scenario`)
//! - Forecast orchestration (`forecast`)
//!
//! ## Dependencies
//!
//! - forecast_core: series, statistics, result and error types
//! - rand / rand_distr: seeded generators and index sampling
//! - rayon: parallel path chunks
//! - tracing: per-horizon and completion events
//!
//! ## Usage Examples
//!
//! ```rust
//! use forecast_core::types::EstimationMethod;
//! use forecast_engine::mc::SimulationConfig;
//! use forecast_engine::{forecast, ForecastRequest};
//!
//! let closes: Vec<f64> = (0..130).map(|i| 100.0 * (1.0 + 0.001 * i as f64)).collect();
//!
//! let config = SimulationConfig::builder()
//!     .simulations(1_000)
//!     .block_size(5)
//!     .method(EstimationMethod::BlockBootstrap)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let request = ForecastRequest::new(closes, vec![5, 20, 60]).with_target(20, 104.0);
//! let result = forecast(&request, &config).unwrap();
//!
//! for h in &result.horizons {
//!     assert!(h.band.lower() <= h.band.upper());
//!     assert!((0.0..=1.0).contains(&h.probability_of_rise));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation of results via forecast_core

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod forecast;
pub mod mc;
pub mod rng;
pub mod scenario;

pub use forecast::{forecast, ForecastEngine, ForecastRequest};
pub use mc::{CancellationToken, SimulationConfig};
