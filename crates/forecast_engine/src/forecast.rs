//! Forecast orchestration.
//!
//! [`ForecastEngine`] validates a [`ForecastRequest`], derives log-returns,
//! dispatches to the configured simulator and assembles a
//! [`ForecastResult`]. All validation happens before any path is simulated.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use forecast_core::types::{
    is_finite_positive, EstimationMethod, ForecastError, ForecastResult, HorizonResult,
    LogReturnSeries, PriceSeries, SeriesKind, SimulationDiagnostics, ValidationError,
};
use tracing::{debug, info, warn};

use crate::mc::{
    calibrate, summarise_gbm, summarise_terminals, BootstrapSimulator, CancellationToken,
    GbmSimulator, PathExecutor, SimulationConfig,
};
use crate::rng::ForecastRng;

/// Input of one forecast call: the close history, the horizons to forecast
/// and optional per-horizon target prices.
///
/// # Examples
///
/// ```rust
/// use forecast_engine::ForecastRequest;
///
/// let closes: Vec<f64> = (0..130).map(|i| 100.0 + i as f64 * 0.1).collect();
/// let request = ForecastRequest::new(closes, vec![5, 20, 60]).with_target(20, 105.0);
///
/// assert_eq!(request.horizons(), &[5, 20, 60]);
/// assert_eq!(request.target(20), Some(105.0));
/// assert_eq!(request.target(5), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastRequest {
    prices: PriceSeries,
    horizons: Vec<u32>,
    targets: BTreeMap<u32, f64>,
}

impl ForecastRequest {
    /// Creates a request without target prices.
    pub fn new(prices: impl Into<PriceSeries>, horizons: Vec<u32>) -> Self {
        Self {
            prices: prices.into(),
            horizons,
            targets: BTreeMap::new(),
        }
    }

    /// Adds a target price for one horizon, replacing any previous one.
    pub fn with_target(mut self, horizon: u32, price: f64) -> Self {
        self.targets.insert(horizon, price);
        self
    }

    /// Adds several `(horizon, price)` targets.
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = (u32, f64)>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Close history.
    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    /// Requested horizons, in request order.
    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    /// Target price for a horizon, if one was given.
    pub fn target(&self, horizon: u32) -> Option<f64> {
        self.targets.get(&horizon).copied()
    }
}

/// Runs forecasts with a fixed [`SimulationConfig`].
///
/// The engine holds no state between calls and can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use forecast_engine::mc::SimulationConfig;
/// use forecast_engine::{ForecastEngine, ForecastRequest};
///
/// let closes: Vec<f64> = (0..130).map(|i| 100.0 * (1.0 + 0.002 * i as f64)).collect();
/// let config = SimulationConfig::builder().simulations(500).seed(1).build().unwrap();
///
/// let result = ForecastEngine::new(config)
///     .run(&ForecastRequest::new(closes, vec![20, 5]))
///     .unwrap();
///
/// assert_eq!(result.horizons.len(), 2);
/// assert_eq!(result.horizons[0].horizon_days, 5);
/// assert_eq!(result.seed, 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ForecastEngine {
    config: SimulationConfig,
}

impl ForecastEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs a forecast.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::Validation`] for bad horizons or an invalid last price
    /// - [`ForecastError::InsufficientData`] if the closes or the clean
    ///   log-returns are too few for the configured method
    /// - [`ForecastError::SimulationFailure`] if calibration fails or no path
    ///   survives for some horizon
    /// - [`ForecastError::InvalidForecast`] if a GBM band fails its sanity check
    pub fn run(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastError> {
        self.execute(request, None)
    }

    /// Runs a forecast that stops with [`ForecastError::Cancelled`] once
    /// `token` fires.
    pub fn run_cancellable(
        &self,
        request: &ForecastRequest,
        token: &CancellationToken,
    ) -> Result<ForecastResult, ForecastError> {
        self.execute(request, Some(token.clone()))
    }

    fn execute(
        &self,
        request: &ForecastRequest,
        cancel: Option<CancellationToken>,
    ) -> Result<ForecastResult, ForecastError> {
        let method = self.config.method();
        let horizons = self.validate_horizons(request.horizons())?;

        let prices = request.prices();
        if prices.len() < method.min_closes() {
            return Err(ForecastError::InsufficientData {
                series: SeriesKind::Closes,
                required: method.min_closes(),
                actual: prices.len(),
            });
        }

        let last_price = match prices.last() {
            Some(p) if is_finite_positive(p) => p,
            other => {
                return Err(ValidationError::InvalidLastPrice(other.unwrap_or(f64::NAN)).into())
            }
        };

        let returns = LogReturnSeries::from_prices(prices);
        if returns.len() < method.min_returns() {
            return Err(ForecastError::InsufficientData {
                series: SeriesKind::LogReturns,
                required: method.min_returns(),
                actual: returns.len(),
            });
        }
        if returns.dropped() > 0 {
            warn!(
                dropped = returns.dropped(),
                kept = returns.len(),
                "Skipped invalid close pairs while deriving log-returns"
            );
        }

        let seed = self
            .config
            .seed()
            .unwrap_or_else(|| ForecastRng::from_entropy().seed());
        let rng = ForecastRng::from_seed(seed);
        let executor = PathExecutor::new(self.config.simulations(), self.config.parallel())
            .with_cancellation(cancel);

        let mut diagnostics = SimulationDiagnostics {
            dropped_returns: returns.dropped(),
            ..SimulationDiagnostics::default()
        };

        let (results, calibration, block_size) = match method {
            EstimationMethod::BlockBootstrap => {
                let results = self.run_bootstrap(
                    &returns,
                    last_price,
                    &horizons,
                    request,
                    &executor,
                    &rng,
                    &mut diagnostics,
                )?;
                (results, None, Some(self.config.block_size()))
            }
            EstimationMethod::Gbm => {
                let calibration = calibrate(&returns)?;
                debug!(mu = calibration.mu, sigma = calibration.sigma, "Calibrated GBM");

                let horizon = horizons[0];
                let paths = GbmSimulator::new(last_price, calibration, horizon)
                    .simulate(&executor, &rng.stream(u64::from(horizon)))?;
                diagnostics.skipped_steps += paths.skipped_steps;
                diagnostics.discarded_paths += paths.discarded_paths;
                if paths.skipped_steps > 0 {
                    warn!(horizon, skipped = paths.skipped_steps, "Skipped non-finite GBM steps");
                }
                debug!(
                    horizon,
                    paths = paths.len(),
                    discarded = paths.discarded_paths,
                    "Simulated GBM horizon"
                );

                let result = summarise_gbm(&paths, last_price, horizon, request.target(horizon))?;
                (vec![result], Some(calibration), None)
            }
        };

        info!(
            method = %method,
            simulations = self.config.simulations(),
            horizons = results.len(),
            seed,
            "Forecast complete"
        );

        Ok(ForecastResult {
            last_price,
            simulations: self.config.simulations(),
            method,
            block_size,
            calibration,
            horizons: results,
            seed,
            as_of: Utc::now(),
            diagnostics,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn run_bootstrap(
        &self,
        returns: &LogReturnSeries,
        last_price: f64,
        horizons: &[u32],
        request: &ForecastRequest,
        executor: &PathExecutor,
        rng: &ForecastRng,
        diagnostics: &mut SimulationDiagnostics,
    ) -> Result<Vec<HorizonResult>, ForecastError> {
        let block_size = self.config.block_size();
        let mut results = Vec::with_capacity(horizons.len());

        for &horizon in horizons {
            let paths = BootstrapSimulator::new(returns, last_price, horizon, block_size)
                .simulate(executor, &rng.stream(u64::from(horizon)))?;
            diagnostics.discarded_paths += paths.discarded_paths;
            debug!(
                horizon,
                paths = paths.len(),
                discarded = paths.discarded_paths,
                "Simulated bootstrap horizon"
            );

            results.push(summarise_terminals(
                &paths.terminals,
                last_price,
                horizon,
                request.target(horizon),
            ));
        }

        Ok(results)
    }

    /// Checks horizons and returns them in ascending order.
    fn validate_horizons(&self, horizons: &[u32]) -> Result<Vec<u32>, ValidationError> {
        if horizons.is_empty() {
            return Err(ValidationError::EmptyHorizons);
        }
        if self.config.method() == EstimationMethod::Gbm && horizons.len() != 1 {
            return Err(ValidationError::GbmHorizonCount(horizons.len()));
        }

        let max = self.config.max_horizon();
        let mut seen = HashSet::with_capacity(horizons.len());
        for &horizon in horizons {
            if horizon == 0 || horizon > max {
                return Err(ValidationError::HorizonOutOfRange { horizon, max });
            }
            if !seen.insert(horizon) {
                return Err(ValidationError::DuplicateHorizon(horizon));
            }
        }

        let mut sorted = horizons.to_vec();
        sorted.sort_unstable();
        Ok(sorted)
    }
}

/// Runs a single forecast with the given configuration.
///
/// Shorthand for `ForecastEngine::new(config.clone()).run(request)`.
pub fn forecast(
    request: &ForecastRequest,
    config: &SimulationConfig,
) -> Result<ForecastResult, ForecastError> {
    ForecastEngine::new(config.clone()).run(request)
}
