//! # Random Number Generation Infrastructure
//!
//! This module provides the random source for the simulators. Every forecast
//! call owns its generator; nothing reads from an ambient, process-wide RNG.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: All generators are seeded; the seed is reported on the result
//! - **Independence**: Parallel workers draw from streams derived from the base seed
//!   and a stream index, never from a shared generator
//! - **Robustness**: Normal deviates that come out non-finite are replaced by `0.0`
//!
//! ## Usage Example
//!
//! ```rust
//! use forecast_engine::rng::ForecastRng;
//!
//! let mut rng = ForecastRng::from_seed(12345);
//!
//! // Uniform value in [0, 1)
//! let u = rng.gen_uniform();
//! assert!((0.0..1.0).contains(&u));
//!
//! // Box-Muller standard normal deviate
//! let z = rng.gen_standard_normal();
//! assert!(z.is_finite());
//!
//! // Independent stream for worker 3
//! let mut worker = rng.stream(3);
//! let _ = worker.gen_index(250);
//! ```

mod prng;

pub use prng::{derive_stream_seed, ForecastRng};

#[cfg(test)]
mod tests;
