//! Block-bootstrap resampling of historical log-returns.
//!
//! A path is built by repeatedly picking a uniform start index into the
//! return history and consuming up to `block_size` consecutive returns
//! (wrapping past the end) until `horizon` returns have been summed.
//! Contiguous blocks keep short-run autocorrelation that independent draws
//! would destroy.

use forecast_core::types::{is_finite_positive, ForecastError, LogReturnSeries, ValidationError};
use rand_distr::Uniform;

use super::executor::PathExecutor;
use crate::rng::ForecastRng;

/// Draws one cumulative log-return of `horizon` days by block resampling.
///
/// Only finite returns count towards the horizon.
///
/// # Errors
///
/// - [`ValidationError::BlockSize`] if `block_size` is zero
/// - [`ForecastError::SimulationFailure`] if `returns` holds no finite value
///
/// # Examples
///
/// ```rust
/// use forecast_engine::mc::sample_block_sum;
/// use forecast_engine::rng::ForecastRng;
///
/// let returns = [0.01; 50];
/// let mut rng = ForecastRng::from_seed(1);
/// let sum = sample_block_sum(&returns, 20, 5, &mut rng).unwrap();
/// assert!((sum - 0.2).abs() < 1e-12);
/// ```
pub fn sample_block_sum(
    returns: &[f64],
    horizon: u32,
    block_size: usize,
    rng: &mut ForecastRng,
) -> Result<f64, ForecastError> {
    if block_size == 0 {
        return Err(ValidationError::BlockSize(block_size).into());
    }
    if !returns.iter().any(|r| r.is_finite()) {
        return Err(ForecastError::simulation_failure(
            "cannot resample a return series with no finite value",
        ));
    }
    let starts = Uniform::new(0, returns.len());
    Ok(draw_block_sum(returns, horizon as usize, block_size, &starts, rng))
}

/// `block_size` must be positive and `returns` must hold a finite value.
#[inline]
fn draw_block_sum(
    returns: &[f64],
    horizon: usize,
    block_size: usize,
    starts: &Uniform<usize>,
    rng: &mut ForecastRng,
) -> f64 {
    let n = returns.len();
    let mut sum = 0.0;
    let mut filled = 0;

    while filled < horizon {
        let start = rng.sample(starts);
        for offset in 0..block_size {
            if filled == horizon {
                break;
            }
            let r = returns[(start + offset) % n];
            if r.is_finite() {
                sum += r;
                filled += 1;
            }
        }
    }

    sum
}

/// Terminal prices of a bootstrap run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BootstrapPaths {
    /// Terminal price of each surviving path.
    pub terminals: Vec<f64>,
    /// Paths excluded because the terminal price was non-finite or non-positive.
    pub discarded_paths: usize,
}

impl BootstrapPaths {
    /// Number of surviving paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    /// Returns `true` if no path survived.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }

    /// Appends another chunk's outcomes.
    pub fn merge(&mut self, other: BootstrapPaths) {
        self.terminals.extend(other.terminals);
        self.discarded_paths += other.discarded_paths;
    }
}

/// Block-bootstrap simulator for a single horizon.
#[derive(Clone, Copy, Debug)]
pub struct BootstrapSimulator<'a> {
    returns: &'a LogReturnSeries,
    last_price: f64,
    horizon: u32,
    block_size: usize,
}

impl<'a> BootstrapSimulator<'a> {
    /// Creates a simulator over `returns` starting at `last_price`.
    pub fn new(
        returns: &'a LogReturnSeries,
        last_price: f64,
        horizon: u32,
        block_size: usize,
    ) -> Self {
        Self {
            returns,
            last_price,
            horizon,
            block_size,
        }
    }

    /// Simulates `n` paths with the given generator.
    ///
    /// A zero block size or an empty return series yields no paths; use
    /// [`simulate`](Self::simulate) for the checked entry point.
    pub fn simulate_chunk(&self, rng: &mut ForecastRng, n: usize) -> BootstrapPaths {
        let returns = self.returns.as_slice();
        if self.block_size == 0 || returns.is_empty() {
            return BootstrapPaths::default();
        }
        let starts = Uniform::new(0, returns.len());
        let mut out = BootstrapPaths {
            terminals: Vec::with_capacity(n),
            discarded_paths: 0,
        };

        for _ in 0..n {
            let sum = draw_block_sum(returns, self.horizon as usize, self.block_size, &starts, rng);
            let terminal = self.last_price * sum.exp();
            if is_finite_positive(terminal) {
                out.terminals.push(terminal);
            } else {
                out.discarded_paths += 1;
            }
        }

        out
    }

    /// Runs every path through the executor and merges the chunks in order.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::Validation`] if the block size is zero
    /// - [`ForecastError::SimulationFailure`] if the return series is empty
    ///   or no path survived
    /// - [`ForecastError::Cancelled`] if the executor's token fires
    pub fn simulate(
        &self,
        executor: &PathExecutor,
        rng: &ForecastRng,
    ) -> Result<BootstrapPaths, ForecastError> {
        if self.block_size == 0 {
            return Err(ValidationError::BlockSize(self.block_size).into());
        }
        if self.returns.is_empty() {
            return Err(ForecastError::simulation_failure(
                "cannot resample an empty return series",
            ));
        }

        let chunks = executor.run(rng, |chunk_rng, n| self.simulate_chunk(chunk_rng, n))?;

        let mut paths = BootstrapPaths {
            terminals: Vec::with_capacity(executor.n_paths()),
            discarded_paths: 0,
        };
        for chunk in chunks {
            paths.merge(chunk);
        }

        if paths.is_empty() {
            return Err(ForecastError::simulation_failure(format!(
                "no valid bootstrap paths for horizon {}",
                self.horizon
            )));
        }
        Ok(paths)
    }
}
