//! Run command implementation
//!
//! Loads a quote file, applies the look-back range and runs a forecast.

use std::fmt::Write as _;
use std::path::Path;

use forecast_core::types::{ForecastResult, PriceBand};
use forecast_engine::{ForecastEngine, ForecastRequest};
use tracing::info;

use crate::config::{ForecastSettings, OutputFormat};
use crate::quotes::load_quotes;
use crate::Result;

/// Run the forecast command
pub fn run(quotes: &Path, settings: &ForecastSettings, targets: &[(u32, f64)]) -> Result<()> {
    let result = forecast_from_file(quotes, settings, targets)?;

    let output = match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Table => render_table(&result),
    };
    println!("{}", output);

    Ok(())
}

/// Loads quotes and produces a forecast without printing it.
pub fn forecast_from_file(
    quotes: &Path,
    settings: &ForecastSettings,
    targets: &[(u32, f64)],
) -> Result<ForecastResult> {
    info!("Starting forecast...");
    info!("  Quotes: {}", quotes.display());
    info!("  Method: {}", settings.method);
    info!("  Range: {}", settings.range);
    info!("  Simulations: {}", settings.simulations);

    let file = load_quotes(quotes)?.restrict(settings.range)?;
    let config = settings.simulation_config()?;
    let request = ForecastRequest::new(file.closes(), settings.horizons.clone())
        .with_targets(targets.iter().copied());

    let result = ForecastEngine::new(config).run(&request)?;

    info!("Forecast complete");
    Ok(result)
}

/// Parses a `DAYS=PRICE` target argument.
pub fn parse_target(s: &str) -> std::result::Result<(u32, f64), String> {
    let (days, price) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DAYS=PRICE, got '{}'", s))?;
    let days = days
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid horizon '{}': {}", days, e))?;
    let price = price
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid price '{}': {}", price, e))?;
    Ok((days, price))
}

/// Renders a forecast as a text table.
pub fn render_table(result: &ForecastResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Last price:  {:.4}", result.last_price);
    let _ = write!(out, "Method:      {}", result.method);
    if let Some(block_size) = result.block_size {
        let _ = write!(out, " (block size {})", block_size);
    }
    if let Some(cal) = result.calibration {
        let _ = write!(out, " (mu {:.6}, sigma {:.6})", cal.mu, cal.sigma);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Simulations: {}", result.simulations);
    let _ = writeln!(out, "Seed:        {}", result.seed);
    let _ = writeln!(out, "As of:       {}", result.as_of.to_rfc3339());

    let _ = writeln!(
        out,
        "\n┌─────────┬─────────┬──────────┬──────────┬────────────┬────────────┬──────────┬──────────┐"
    );
    let _ = writeln!(
        out,
        "│ Horizon │ P(rise) │ Median   │ VaR 5%   │ Low        │ High       │ Scenario │ P(≥tgt)  │"
    );
    let _ = writeln!(
        out,
        "├─────────┼─────────┼──────────┼──────────┼────────────┼────────────┼──────────┼──────────┤"
    );
    for h in &result.horizons {
        let target = h
            .prob_above_target
            .map(|p| format!("{:>7.1}%", p * 100.0))
            .unwrap_or_else(|| format!("{:>8}", "-"));
        let _ = writeln!(
            out,
            "│ {:>7} │ {:>6.1}% │ {:>+7.2}% │ {:>+7.2}% │ {:>10.4} │ {:>10.4} │ {:<8} │ {} │",
            h.horizon_days,
            h.probability_of_rise * 100.0,
            h.median_return * 100.0,
            h.var5 * 100.0,
            h.band.lower(),
            h.band.upper(),
            h.scenario.as_str(),
            target,
        );
    }
    let _ = writeln!(
        out,
        "└─────────┴─────────┴──────────┴──────────┴────────────┴────────────┴──────────┴──────────┘"
    );

    let band = match result.horizons.first().map(|h| h.band) {
        Some(PriceBand::PathExtrema { .. }) => "10th pct of path minima / 90th pct of path maxima",
        _ => "10th / 90th pct of terminal prices",
    };
    let _ = writeln!(out, "Band: {}", band);

    if result.diagnostics.any() {
        let d = result.diagnostics;
        let _ = writeln!(
            out,
            "Skipped: {} return pairs, {} steps, {} paths",
            d.dropped_returns, d.skipped_steps, d.discarded_paths
        );
    }

    out
}
