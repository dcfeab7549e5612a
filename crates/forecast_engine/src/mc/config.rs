//! Simulation run configuration.
//!
//! This module provides the immutable [`SimulationConfig`] and its builder.
//! A config is validated once at `build()` and can then be reused for any
//! number of forecast calls.

use forecast_core::types::{EstimationMethod, ValidationError};

/// Minimum number of simulated paths per horizon.
pub const MIN_SIMULATIONS: usize = 100;

/// Maximum number of simulated paths per horizon.
pub const MAX_SIMULATIONS: usize = 1_000_000;

/// Default number of simulated paths per horizon.
pub const DEFAULT_SIMULATIONS: usize = 2000;

/// Default bootstrap block length in trading days.
pub const DEFAULT_BLOCK_SIZE: usize = 5;

/// Default upper bound on a requested horizon, in trading days.
pub const DEFAULT_MAX_HORIZON: u32 = 365;

/// Forecast simulation configuration.
///
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use forecast_core::types::EstimationMethod;
/// use forecast_engine::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .simulations(5_000)
///     .block_size(10)
///     .method(EstimationMethod::BlockBootstrap)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.simulations(), 5_000);
/// assert_eq!(config.block_size(), 10);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Paths simulated per horizon.
    simulations: usize,
    /// Bootstrap block length.
    block_size: usize,
    /// Path generation strategy.
    method: EstimationMethod,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Run path chunks on the rayon pool.
    parallel: bool,
    /// Largest accepted horizon.
    max_horizon: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            block_size: DEFAULT_BLOCK_SIZE,
            method: EstimationMethod::default(),
            seed: None,
            parallel: true,
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of paths simulated per horizon.
    #[inline]
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Returns the bootstrap block length.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the estimation method.
    #[inline]
    pub fn method(&self) -> EstimationMethod {
        self.method
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns `true` if path chunks run in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the largest accepted horizon.
    #[inline]
    pub fn max_horizon(&self) -> u32 {
        self.max_horizon
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `simulations` is outside [100, 1,000,000]
    /// - `block_size` is 0
    /// - `max_horizon` is 0
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_SIMULATIONS..=MAX_SIMULATIONS).contains(&self.simulations) {
            return Err(ValidationError::SimulationCount {
                count: self.simulations,
                min: MIN_SIMULATIONS,
                max: MAX_SIMULATIONS,
            });
        }
        if self.block_size == 0 {
            return Err(ValidationError::BlockSize(self.block_size));
        }
        if self.max_horizon == 0 {
            return Err(ValidationError::InvalidParameter {
                name: "max_horizon",
                value: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Every field has a default, so `SimulationConfig::builder().build()` yields
/// 2000 block-bootstrap paths with block size 5, parallel execution, a
/// 365-day horizon cap and an entropy-drawn seed.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    simulations: Option<usize>,
    block_size: Option<usize>,
    method: EstimationMethod,
    seed: Option<u64>,
    parallel: Option<bool>,
    max_horizon: Option<u32>,
}

impl SimulationConfigBuilder {
    /// Sets the number of paths per horizon.
    ///
    /// # Arguments
    ///
    /// * `simulations` - Number of paths in [100, 1_000_000]
    #[inline]
    pub fn simulations(mut self, simulations: usize) -> Self {
        self.simulations = Some(simulations);
        self
    }

    /// Sets the bootstrap block length (ignored in GBM mode).
    #[inline]
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Sets the estimation method.
    #[inline]
    pub fn method(mut self, method: EstimationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed; `None` draws one from OS entropy per call.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel path execution.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Sets the largest accepted horizon.
    #[inline]
    pub fn max_horizon(mut self, max_horizon: u32) -> Self {
        self.max_horizon = Some(max_horizon);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any parameter is out of range
    /// (see [`SimulationConfig::validate`]).
    pub fn build(self) -> Result<SimulationConfig, ValidationError> {
        let config = SimulationConfig {
            simulations: self.simulations.unwrap_or(DEFAULT_SIMULATIONS),
            block_size: self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE),
            method: self.method,
            seed: self.seed,
            parallel: self.parallel.unwrap_or(true),
            max_horizon: self.max_horizon.unwrap_or(DEFAULT_MAX_HORIZON),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = SimulationConfig::builder().build().unwrap();

        assert_eq!(config.simulations(), DEFAULT_SIMULATIONS);
        assert_eq!(config.block_size(), DEFAULT_BLOCK_SIZE);
        assert_eq!(config.method(), EstimationMethod::BlockBootstrap);
        assert_eq!(config.seed(), None);
        assert!(config.parallel());
        assert_eq!(config.max_horizon(), DEFAULT_MAX_HORIZON);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = SimulationConfig::builder()
            .simulations(500)
            .block_size(3)
            .method(EstimationMethod::Gbm)
            .seed(7)
            .parallel(false)
            .max_horizon(30)
            .build()
            .unwrap();

        assert_eq!(config.simulations(), 500);
        assert_eq!(config.block_size(), 3);
        assert_eq!(config.method(), EstimationMethod::Gbm);
        assert_eq!(config.seed(), Some(7));
        assert!(!config.parallel());
        assert_eq!(config.max_horizon(), 30);
    }

    #[test]
    fn test_config_maybe_seed() {
        let config = SimulationConfig::builder()
            .seed(1)
            .maybe_seed(None)
            .build()
            .unwrap();
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_config_simulation_bounds() {
        assert!(SimulationConfig::builder().simulations(100).build().is_ok());
        assert!(SimulationConfig::builder()
            .simulations(MAX_SIMULATIONS)
            .build()
            .is_ok());

        let result = SimulationConfig::builder().simulations(99).build();
        assert!(matches!(
            result,
            Err(ValidationError::SimulationCount { count: 99, .. })
        ));

        let result = SimulationConfig::builder()
            .simulations(MAX_SIMULATIONS + 1)
            .build();
        assert!(matches!(result, Err(ValidationError::SimulationCount { .. })));
    }

    #[test]
    fn test_config_invalid_block_size() {
        let result = SimulationConfig::builder().block_size(0).build();
        assert!(matches!(result, Err(ValidationError::BlockSize(0))));
    }

    #[test]
    fn test_config_invalid_max_horizon() {
        let result = SimulationConfig::builder().max_horizon(0).build();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidParameter {
                name: "max_horizon",
                ..
            })
        ));
    }
}
