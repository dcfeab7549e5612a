//! Forecast output types.
//!
//! A forecast call produces exactly one [`ForecastResult`] holding one
//! [`HorizonResult`] per requested horizon, ordered by ascending day count.
//! Nothing here is retained by the engine once handed to the caller.
//!
//! With the `serde` feature every type serialises with camelCase field names
//! so a transport layer can forward results unchanged.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

/// Discrete outlook derived from aggregate simulation statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ScenarioLabel {
    /// High rise probability with contained downside.
    Bull,
    /// Neither bullish nor bearish.
    Base,
    /// Low rise probability or heavy downside tail.
    Bear,
}

impl ScenarioLabel {
    /// Upper-case label as shown on dashboards.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioLabel::Bull => "BULL",
            ScenarioLabel::Base => "BASE",
            ScenarioLabel::Bear => "BEAR",
        }
    }
}

impl fmt::Display for ScenarioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Strategy used to generate simulated price paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EstimationMethod {
    /// Parametric geometric Brownian motion calibrated from log-return moments.
    Gbm,
    /// Non-parametric resampling of contiguous historical return blocks.
    #[default]
    BlockBootstrap,
}

impl EstimationMethod {
    /// Minimum number of closes the method needs.
    pub fn min_closes(&self) -> usize {
        match self {
            EstimationMethod::Gbm => 3,
            EstimationMethod::BlockBootstrap => 120,
        }
    }

    /// Minimum number of clean log-returns the method needs.
    pub fn min_returns(&self) -> usize {
        match self {
            EstimationMethod::Gbm => 2,
            EstimationMethod::BlockBootstrap => 119,
        }
    }

    /// Lower-case tag used in configuration files and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimationMethod::Gbm => "gbm",
            EstimationMethod::BlockBootstrap => "block-bootstrap",
        }
    }
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EstimationMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbm" => Ok(EstimationMethod::Gbm),
            "block-bootstrap" | "bootstrap" => Ok(EstimationMethod::BlockBootstrap),
            other => Err(ValidationError::InvalidParameter {
                name: "method",
                value: format!("unknown estimation method '{}'", other),
            }),
        }
    }
}

/// Price range reported for a horizon.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum PriceBand {
    /// 10th and 90th percentile of terminal prices.
    Terminal {
        /// 10th percentile terminal price
        p10_price: f64,
        /// 90th percentile terminal price
        p90_price: f64,
    },
    /// 10th percentile of path minima and 90th percentile of path maxima.
    PathExtrema {
        /// Lower bound from path minima
        low: f64,
        /// Upper bound from path maxima
        high: f64,
    },
}

impl PriceBand {
    /// Lower edge of the band.
    #[inline]
    pub fn lower(&self) -> f64 {
        match *self {
            PriceBand::Terminal { p10_price, .. } => p10_price,
            PriceBand::PathExtrema { low, .. } => low,
        }
    }

    /// Upper edge of the band.
    #[inline]
    pub fn upper(&self) -> f64 {
        match *self {
            PriceBand::Terminal { p90_price, .. } => p90_price,
            PriceBand::PathExtrema { high, .. } => high,
        }
    }
}

/// Statistics for one forecast horizon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HorizonResult {
    /// Horizon in trading days.
    pub horizon_days: u32,
    /// Fraction of surviving paths ending above the last price.
    pub probability_of_rise: f64,
    /// Median simple return over the horizon.
    pub median_return: f64,
    /// 5th percentile simple return (VaR proxy).
    pub var5: f64,
    /// Reported price range.
    pub band: PriceBand,
    /// Scenario classification.
    pub scenario: ScenarioLabel,
    /// Fraction of surviving paths ending at or above the target price.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub prob_above_target: Option<f64>,
    /// Number of paths that contributed to the statistics.
    pub paths: usize,
}

/// Drift and volatility estimated from log-returns (GBM mode).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GbmCalibration {
    /// Mean daily log-return.
    pub mu: f64,
    /// Sample standard deviation of daily log-returns.
    pub sigma: f64,
}

/// Counters for values skipped by the robustness policy.
///
/// Corrupt inputs and numerical blow-ups are skipped silently during a run;
/// these counters make the skipping observable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimulationDiagnostics {
    /// Adjacent close pairs skipped while deriving log-returns.
    pub dropped_returns: usize,
    /// GBM steps whose update was non-finite or non-positive.
    pub skipped_steps: usize,
    /// Paths excluded from the sample sets.
    pub discarded_paths: usize,
}

impl SimulationDiagnostics {
    /// Adds another set of counters into this one.
    pub fn absorb(&mut self, other: SimulationDiagnostics) {
        self.dropped_returns += other.dropped_returns;
        self.skipped_steps += other.skipped_steps;
        self.discarded_paths += other.discarded_paths;
    }

    /// Returns `true` if anything was skipped.
    pub fn any(&self) -> bool {
        self.dropped_returns > 0 || self.skipped_steps > 0 || self.discarded_paths > 0
    }
}

/// Complete output of one forecast call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ForecastResult {
    /// Last observed close, the starting point of every path.
    pub last_price: f64,
    /// Paths simulated per horizon.
    pub simulations: usize,
    /// Estimation strategy used.
    pub method: EstimationMethod,
    /// Block size (block-bootstrap only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub block_size: Option<usize>,
    /// Drift and volatility (GBM only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub calibration: Option<GbmCalibration>,
    /// Per-horizon statistics, ascending by horizon.
    pub horizons: Vec<HorizonResult>,
    /// Seed that reproduces this result.
    pub seed: u64,
    /// Time the forecast was computed.
    pub as_of: DateTime<Utc>,
    /// Robustness counters.
    pub diagnostics: SimulationDiagnostics,
}

impl ForecastResult {
    /// Looks up the result for a given horizon.
    pub fn horizon(&self, days: u32) -> Option<&HorizonResult> {
        self.horizons.iter().find(|h| h.horizon_days == days)
    }
}
