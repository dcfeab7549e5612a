//! Per-horizon aggregation of simulated terminal prices.

use forecast_core::math::{fraction_where, quantile_sorted, sorted_copy};
use forecast_core::types::{ForecastError, HorizonResult, PriceBand};

use super::gbm::GbmPaths;
use crate::scenario::classify;

/// Aggregate statistics over a set of surviving terminal prices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalStats {
    /// Fraction of terminals strictly above the last price.
    pub probability_of_rise: f64,
    /// Median simple return.
    pub median_return: f64,
    /// 5th percentile simple return.
    pub var5: f64,
    /// 10th percentile terminal price.
    pub p10_price: f64,
    /// 90th percentile terminal price.
    pub p90_price: f64,
    /// Fraction of terminals at or above the target, if a target was given.
    pub prob_above_target: Option<f64>,
    /// Number of terminals aggregated.
    pub paths: usize,
}

impl TerminalStats {
    /// Computes statistics over non-empty `terminals`.
    ///
    /// Returns are `T / last_price - 1`. A target is used only when it is
    /// finite and positive.
    pub fn from_terminals(terminals: &[f64], last_price: f64, target: Option<f64>) -> Self {
        let sorted_prices = sorted_copy(terminals);
        let sorted_returns: Vec<f64> = sorted_prices.iter().map(|t| t / last_price - 1.0).collect();

        let prob_above_target = target
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(|target| fraction_where(terminals, |t| t >= target));

        Self {
            probability_of_rise: fraction_where(terminals, |t| t > last_price),
            median_return: quantile_sorted(&sorted_returns, 0.5),
            var5: quantile_sorted(&sorted_returns, 0.05),
            p10_price: quantile_sorted(&sorted_prices, 0.10),
            p90_price: quantile_sorted(&sorted_prices, 0.90),
            prob_above_target,
            paths: terminals.len(),
        }
    }

    fn into_horizon_result(self, horizon_days: u32, band: PriceBand) -> HorizonResult {
        HorizonResult {
            horizon_days,
            probability_of_rise: self.probability_of_rise,
            median_return: self.median_return,
            var5: self.var5,
            band,
            scenario: classify(self.probability_of_rise, self.median_return, self.var5),
            prob_above_target: self.prob_above_target,
            paths: self.paths,
        }
    }
}

/// Builds a bootstrap horizon result with a terminal-percentile band.
pub fn summarise_terminals(
    terminals: &[f64],
    last_price: f64,
    horizon_days: u32,
    target: Option<f64>,
) -> HorizonResult {
    let stats = TerminalStats::from_terminals(terminals, last_price, target);
    let band = PriceBand::Terminal {
        p10_price: stats.p10_price,
        p90_price: stats.p90_price,
    };
    stats.into_horizon_result(horizon_days, band)
}

/// Builds a GBM horizon result with a path-extrema band.
///
/// `low` is the 10th percentile of path minima and `high` the 90th
/// percentile of path maxima.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidForecast`] unless `0 < low <= high` with
/// both finite.
pub fn summarise_gbm(
    paths: &GbmPaths,
    last_price: f64,
    horizon_days: u32,
    target: Option<f64>,
) -> Result<HorizonResult, ForecastError> {
    let low = quantile_sorted(&sorted_copy(&paths.minima), 0.10);
    let high = quantile_sorted(&sorted_copy(&paths.maxima), 0.90);

    if !low.is_finite() || !high.is_finite() || low <= 0.0 || high <= 0.0 || low > high {
        return Err(ForecastError::InvalidForecast { low, high });
    }

    let stats = TerminalStats::from_terminals(&paths.terminals, last_price, target);
    Ok(stats.into_horizon_result(horizon_days, PriceBand::PathExtrema { low, high }))
}
