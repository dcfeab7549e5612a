//! Geometric Brownian motion path simulation.
//!
//! Each path starts at the last observed close and takes one step per
//! trading day:
//!
//! ```text
//! S_{t+1} = S_t * exp((mu - sigma^2 / 2) + sigma * z),   z ~ N(0, 1)
//! ```
//!
//! A step whose update is non-finite or non-positive is skipped and the
//! price held. The running minimum and maximum of every path are recorded
//! along with its terminal price.

use forecast_core::math::{mean, sample_std_dev};
use forecast_core::types::{ForecastError, GbmCalibration, LogReturnSeries};

use super::executor::PathExecutor;
use crate::rng::ForecastRng;

/// Estimates drift and volatility from daily log-returns.
///
/// `mu` is the sample mean; `sigma` the sample standard deviation with an
/// `n - 1` denominator and negative variance floored at zero.
///
/// # Errors
///
/// Returns [`ForecastError::SimulationFailure`] if the series is empty or
/// either estimate is non-finite.
///
/// # Examples
///
/// ```rust
/// use forecast_core::types::{LogReturnSeries, PriceSeries};
/// use forecast_engine::mc::calibrate;
///
/// let prices = PriceSeries::new(vec![100.0, 100.0, 100.0, 100.0]);
/// let cal = calibrate(&LogReturnSeries::from_prices(&prices)).unwrap();
/// assert_eq!(cal.mu, 0.0);
/// assert_eq!(cal.sigma, 0.0);
/// ```
pub fn calibrate(returns: &LogReturnSeries) -> Result<GbmCalibration, ForecastError> {
    let data = returns.as_slice();
    let (mu, sigma) = match (mean(data), sample_std_dev(data)) {
        (Some(mu), Some(sigma)) => (mu, sigma),
        _ => {
            return Err(ForecastError::simulation_failure(
                "cannot estimate mu/sigma from an empty return series",
            ))
        }
    };

    if !mu.is_finite() || !sigma.is_finite() {
        return Err(ForecastError::simulation_failure(format!(
            "failed to estimate mu/sigma (mu = {}, sigma = {})",
            mu, sigma
        )));
    }

    Ok(GbmCalibration { mu, sigma })
}

/// Per-path outcomes of a GBM run.
///
/// The three sample vectors are index-aligned: entry `i` of each belongs to
/// the same surviving path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GbmPaths {
    /// Running minimum of each surviving path.
    pub minima: Vec<f64>,
    /// Running maximum of each surviving path.
    pub maxima: Vec<f64>,
    /// Terminal price of each surviving path.
    pub terminals: Vec<f64>,
    /// Steps skipped because the update was non-finite or non-positive.
    pub skipped_steps: usize,
    /// Paths excluded because their extrema were invalid.
    pub discarded_paths: usize,
}

impl GbmPaths {
    fn with_capacity(n: usize) -> Self {
        Self {
            minima: Vec::with_capacity(n),
            maxima: Vec::with_capacity(n),
            terminals: Vec::with_capacity(n),
            ..Self::default()
        }
    }

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
    pub fn merge(&mut self, other: GbmPaths) {
        self.minima.extend(other.minima);
        self.maxima.extend(other.maxima);
        self.terminals.extend(other.terminals);
        self.skipped_steps += other.skipped_steps;
        self.discarded_paths += other.discarded_paths;
    }
}

/// GBM path simulator for a single horizon.
#[derive(Clone, Copy, Debug)]
pub struct GbmSimulator {
    last_price: f64,
    drift: f64,
    sigma: f64,
    horizon: u32,
}

impl GbmSimulator {
    /// Creates a simulator starting at `last_price`.
    pub fn new(last_price: f64, calibration: GbmCalibration, horizon: u32) -> Self {
        let GbmCalibration { mu, sigma } = calibration;
        Self {
            last_price,
            drift: mu - 0.5 * sigma * sigma,
            sigma,
            horizon,
        }
    }

    /// Simulates one path, pushing its outcome into `out`.
    fn simulate_path(&self, rng: &mut ForecastRng, out: &mut GbmPaths) {
        let mut price = self.last_price;
        let mut path_min = price;
        let mut path_max = price;

        for _ in 0..self.horizon {
            let z = rng.gen_standard_normal();
            let next = price * (self.drift + self.sigma * z).exp();
            if !next.is_finite() || next <= 0.0 {
                out.skipped_steps += 1;
                continue;
            }
            price = next;
            path_min = path_min.min(price);
            path_max = path_max.max(price);
        }

        if path_min.is_finite() && path_max.is_finite() && path_min > 0.0 && path_max > 0.0 {
            out.minima.push(path_min);
            out.maxima.push(path_max);
            out.terminals.push(price);
        } else {
            out.discarded_paths += 1;
        }
    }

    /// Simulates `n` paths with the given generator.
    pub fn simulate_chunk(&self, rng: &mut ForecastRng, n: usize) -> GbmPaths {
        let mut out = GbmPaths::with_capacity(n);
        for _ in 0..n {
            self.simulate_path(rng, &mut out);
        }
        out
    }

    /// Runs every path through the executor and merges the chunks in order.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::Cancelled`] if the executor's token fires
    /// - [`ForecastError::SimulationFailure`] if no path survived
    pub fn simulate(
        &self,
        executor: &PathExecutor,
        rng: &ForecastRng,
    ) -> Result<GbmPaths, ForecastError> {
        let chunks = executor.run(rng, |chunk_rng, n| self.simulate_chunk(chunk_rng, n))?;

        let mut paths = GbmPaths::with_capacity(executor.n_paths());
        for chunk in chunks {
            paths.merge(chunk);
        }

        if paths.is_empty() {
            return Err(ForecastError::simulation_failure(format!(
                "no valid GBM paths for horizon {}",
                self.horizon
            )));
        }
        Ok(paths)
    }
}
