//! # Monte Carlo Path Simulation
//!
//! This module provides the two path generators and the machinery shared by
//! them.
//!
//! ## Components
//!
//! - [`SimulationConfig`]: validated run parameters with a fluent builder
//! - [`PathExecutor`]: chunked path execution, sequential or on rayon
//! - [`CancellationToken`]: cooperative cancellation between chunks
//! - [`GbmSimulator`] / [`calibrate`]: parametric GBM paths
//! - [`BootstrapSimulator`] / [`sample_block_sum`]: block resampling of
//!   historical returns
//! - [`summarise_terminals`] / [`summarise_gbm`]: per-horizon aggregation
//!
//! ## Determinism
//!
//! Chunk `i` of horizon `h` always draws from the stream derived from
//! `(seed, h, i)`, and chunk outputs are merged in chunk order. A fixed seed
//! therefore reproduces the same result regardless of thread count.

mod bootstrap;
mod config;
mod executor;
mod gbm;
mod summary;

pub use bootstrap::{sample_block_sum, BootstrapPaths, BootstrapSimulator};
pub use config::{
    SimulationConfig, SimulationConfigBuilder, DEFAULT_BLOCK_SIZE, DEFAULT_MAX_HORIZON,
    DEFAULT_SIMULATIONS, MAX_SIMULATIONS, MIN_SIMULATIONS,
};
pub use executor::{CancellationToken, PathExecutor, PATH_CHUNK_SIZE};
pub use gbm::{calibrate, GbmPaths, GbmSimulator};
pub use summary::{summarise_gbm, summarise_terminals, TerminalStats};
