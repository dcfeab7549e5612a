//! Forecast settings management
//!
//! Handles loading settings from a TOML file, `FORECAST_*` environment
//! variables and command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use forecast_core::types::{EstimationMethod, ValidationError};
use forecast_engine::mc::{
    SimulationConfig, DEFAULT_BLOCK_SIZE, DEFAULT_MAX_HORIZON, DEFAULT_SIMULATIONS,
};
use serde::Deserialize;
use thiserror::Error;

use crate::quotes::LookbackRange;

/// Horizons forecast when none are configured.
pub const DEFAULT_HORIZONS: [u32; 3] = [5, 20, 60];

/// Configuration error types
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Invalid range: {0}. Must be one of: 1m, 3m, 6m, 1y, 2y, 5y, max")]
    InvalidRange(String),

    #[error("Invalid estimation method: {0}")]
    InvalidMethod(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How forecast results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Forecast settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Estimation method
    #[serde(deserialize_with = "deserialize_from_str")]
    pub method: EstimationMethod,
    /// Paths per horizon
    pub simulations: usize,
    /// Bootstrap block length
    pub block_size: usize,
    /// Horizons to forecast, in trading days
    pub horizons: Vec<u32>,
    /// Seed; drawn from OS entropy when absent
    pub seed: Option<u64>,
    /// Run path chunks in parallel
    pub parallel: bool,
    /// Largest accepted horizon
    pub max_horizon: u32,
    /// Look-back window applied to the quote file
    pub range: LookbackRange,
    /// Output format
    #[serde(deserialize_with = "deserialize_from_str")]
    pub format: OutputFormat,
    /// Log level
    #[serde(deserialize_with = "deserialize_from_str")]
    pub log_level: LogLevel,
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    T::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            method: EstimationMethod::default(),
            simulations: DEFAULT_SIMULATIONS,
            block_size: DEFAULT_BLOCK_SIZE,
            horizons: DEFAULT_HORIZONS.to_vec(),
            seed: None,
            parallel: true,
            max_horizon: DEFAULT_MAX_HORIZON,
            range: LookbackRange::default(),
            format: OutputFormat::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl ForecastSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override fields from `FORECAST_*` variables found by `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FORECAST_METHOD") {
            self.method = v
                .parse()
                .map_err(|e: ValidationError| ConfigError::InvalidMethod(e.to_string()))?;
        }
        if let Some(v) = lookup("FORECAST_SIMULATIONS") {
            self.simulations = parse_value("FORECAST_SIMULATIONS", &v)?;
        }
        if let Some(v) = lookup("FORECAST_BLOCK_SIZE") {
            self.block_size = parse_value("FORECAST_BLOCK_SIZE", &v)?;
        }
        if let Some(v) = lookup("FORECAST_HORIZONS") {
            self.horizons = parse_horizons(&v)?;
        }
        if let Some(v) = lookup("FORECAST_SEED") {
            self.seed = Some(parse_value("FORECAST_SEED", &v)?);
        }
        if let Some(v) = lookup("FORECAST_PARALLEL") {
            self.parallel = match v.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "FORECAST_PARALLEL",
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = lookup("FORECAST_MAX_HORIZON") {
            self.max_horizon = parse_value("FORECAST_MAX_HORIZON", &v)?;
        }
        if let Some(v) = lookup("FORECAST_RANGE") {
            self.range = v.parse()?;
        }
        if let Some(v) = lookup("FORECAST_FORMAT") {
            self.format = v.parse()?;
        }
        if let Some(v) = lookup("FORECAST_LOG_LEVEL") {
            self.log_level = v.parse()?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if let Some(method) = cli.method {
            self.method = method;
        }
        if let Some(simulations) = cli.simulations {
            self.simulations = simulations;
        }
        if let Some(block_size) = cli.block_size {
            self.block_size = block_size;
        }
        if let Some(horizons) = &cli.horizons {
            self.horizons = horizons.clone();
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.sequential {
            self.parallel = false;
        }
        if let Some(range) = cli.range {
            self.range = range;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
    }

    /// Builds the engine configuration.
    pub fn simulation_config(&self) -> Result<SimulationConfig, ValidationError> {
        SimulationConfig::builder()
            .method(self.method)
            .simulations(self.simulations)
            .block_size(self.block_size)
            .maybe_seed(self.seed)
            .parallel(self.parallel)
            .max_horizon(self.max_horizon)
            .build()
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Parses a comma-separated horizon list such as `5,20,60`.
pub fn parse_horizons(value: &str) -> Result<Vec<u32>, ConfigError> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_value("horizons", s))
        .collect()
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Config file path
    pub config_file: Option<PathBuf>,
    pub method: Option<EstimationMethod>,
    pub simulations: Option<usize>,
    pub block_size: Option<usize>,
    pub horizons: Option<Vec<u32>>,
    pub seed: Option<u64>,
    /// Force sequential path execution
    pub sequential: bool,
    pub range: Option<LookbackRange>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<LogLevel>,
}

/// Build settings from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_settings(cli: &CliOverrides) -> Result<ForecastSettings, ConfigError> {
    build_settings_with_env(cli, |key| std::env::var(key).ok())
}

fn build_settings_with_env<F>(
    cli: &CliOverrides,
    lookup: F,
) -> Result<ForecastSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = match &cli.config_file {
        Some(path) => ForecastSettings::from_file(path)?,
        None => ForecastSettings::default(),
    };

    settings.apply_env_from(lookup)?;
    settings.merge_with_cli(cli);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = ForecastSettings::default();
        assert_eq!(settings.method, EstimationMethod::BlockBootstrap);
        assert_eq!(settings.simulations, 2000);
        assert_eq!(settings.block_size, 5);
        assert_eq!(settings.horizons, vec![5, 20, 60]);
        assert_eq!(settings.seed, None);
        assert!(settings.parallel);
        assert_eq!(settings.range, LookbackRange::SixMonths);
        assert_eq!(settings.format, OutputFormat::Table);
        assert_eq!(settings.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
method = "gbm"
simulations = 5000
horizons = [10]
seed = 7
range = "1y"
format = "json"
log_level = "debug"
"#
        )
        .unwrap();

        let settings = ForecastSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.method, EstimationMethod::Gbm);
        assert_eq!(settings.simulations, 5000);
        assert_eq!(settings.horizons, vec![10]);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.range, LookbackRange::OneYear);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.log_level, LogLevel::Debug);
        // Unset fields keep their defaults
        assert_eq!(settings.block_size, 5);
        assert!(settings.parallel);
    }

    #[test]
    fn test_bad_toml_is_file_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "method = \"garch\"").unwrap();

        let result = ForecastSettings::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = ForecastSettings::default();
        settings
            .apply_env_from(env(&[
                ("FORECAST_METHOD", "gbm"),
                ("FORECAST_SIMULATIONS", "800"),
                ("FORECAST_HORIZONS", "3, 9"),
                ("FORECAST_PARALLEL", "false"),
                ("FORECAST_RANGE", "max"),
            ]))
            .unwrap();

        assert_eq!(settings.method, EstimationMethod::Gbm);
        assert_eq!(settings.simulations, 800);
        assert_eq!(settings.horizons, vec![3, 9]);
        assert!(!settings.parallel);
        assert_eq!(settings.range, LookbackRange::Max);
    }

    #[test]
    fn test_env_invalid_values() {
        let mut settings = ForecastSettings::default();
        let result = settings.apply_env_from(env(&[("FORECAST_SIMULATIONS", "many")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "FORECAST_SIMULATIONS",
                ..
            })
        ));

        let result = settings.apply_env_from(env(&[("FORECAST_METHOD", "garch")]));
        assert!(matches!(result, Err(ConfigError::InvalidMethod(_))));
    }

    #[test]
    fn test_priority_cli_over_env_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulations = 3000\nblock_size = 8\nseed = 1").unwrap();

        let cli = CliOverrides {
            config_file: Some(file.path().to_path_buf()),
            seed: Some(99),
            sequential: true,
            ..CliOverrides::default()
        };
        let settings = build_settings_with_env(
            &cli,
            env(&[("FORECAST_SIMULATIONS", "4000"), ("FORECAST_SEED", "2")]),
        )
        .unwrap();

        assert_eq!(settings.block_size, 8);
        assert_eq!(settings.simulations, 4000);
        assert_eq!(settings.seed, Some(99));
        assert!(!settings.parallel);
    }

    #[test]
    fn test_simulation_config_validation() {
        let settings = ForecastSettings {
            simulations: 10,
            ..ForecastSettings::default()
        };
        assert!(matches!(
            settings.simulation_config(),
            Err(ValidationError::SimulationCount { count: 10, .. })
        ));

        let config = ForecastSettings::default().simulation_config().unwrap();
        assert_eq!(config.simulations(), 2000);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_parse_horizons() {
        assert_eq!(parse_horizons("5,20,60").unwrap(), vec![5, 20, 60]);
        assert_eq!(parse_horizons("5,").unwrap(), vec![5]);
        assert!(parse_horizons("5,x").is_err());
    }
}
