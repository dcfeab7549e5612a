//! Forecast CLI - Monte Carlo short-horizon price forecasts from quote files
//!
//! # Commands
//!
//! - `forecast run --quotes <file>` - Forecast price distributions for one or more horizons
//! - `forecast check --quotes <file>` - Summarise a quote file and its usability
//!
//! # Configuration
//!
//! Settings come from an optional TOML file (`--config`), then `FORECAST_*`
//! environment variables, then command-line flags, highest last.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forecast_core::types::EstimationMethod;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod quotes;

pub use error::{CliError, Result};

use config::{build_settings, CliOverrides, LogLevel, OutputFormat};
use quotes::LookbackRange;

/// Monte Carlo price forecaster
#[derive(Parser)]
#[command(name = "forecast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Look-back range (1m, 3m, 6m, 1y, 2y, 5y, max)
    #[arg(short, long, global = true)]
    range: Option<LookbackRange>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast price distributions from a quote file
    Run {
        /// Path to quote file (CSV)
        #[arg(short, long)]
        quotes: PathBuf,

        /// Estimation method (block-bootstrap, gbm)
        #[arg(short, long)]
        method: Option<EstimationMethod>,

        /// Comma-separated horizons in trading days
        #[arg(long, value_delimiter = ',')]
        horizons: Option<Vec<u32>>,

        /// Number of simulated paths per horizon
        #[arg(short = 'n', long)]
        simulations: Option<usize>,

        /// Bootstrap block length
        #[arg(short, long)]
        block_size: Option<usize>,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Target price for a horizon (DAYS=PRICE, repeatable)
        #[arg(short, long = "target", value_parser = commands::run::parse_target)]
        targets: Vec<(u32, f64)>,

        /// Simulate paths on the current thread only
        #[arg(long)]
        sequential: bool,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Summarise a quote file
    Check {
        /// Path to quote file (CSV)
        #[arg(short, long)]
        quotes: PathBuf,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut overrides = CliOverrides {
        config_file: cli.config,
        log_level: cli.log_level,
        range: cli.range,
        ..CliOverrides::default()
    };
    if let Commands::Run {
        method,
        horizons,
        simulations,
        block_size,
        seed,
        sequential,
        format,
        ..
    } = &cli.command
    {
        overrides.method = *method;
        overrides.horizons = horizons.clone();
        overrides.simulations = *simulations;
        overrides.block_size = *block_size;
        overrides.seed = *seed;
        overrides.sequential = *sequential;
        overrides.format = *format;
    }

    let settings = build_settings(&overrides)?;
    init_tracing(settings.log_level.as_filter_str());
    debug!(?settings, "Settings loaded");

    match cli.command {
        Commands::Run { quotes, targets, .. } => commands::run::run(&quotes, &settings, &targets),
        Commands::Check { quotes } => commands::check::run(&quotes, settings.range),
    }
}
