//! Check command implementation
//!
//! Loads a quote file and reports whether it can feed each estimation method.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDate;
use forecast_core::types::{EstimationMethod, LogReturnSeries, PriceSeries};
use tracing::info;

use crate::quotes::{load_quotes, LookbackRange, QuoteBar, QuoteFile, Quotes};
use crate::Result;

/// Summary of a loaded quote file.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSummary {
    pub rows: usize,
    pub skipped_rows: usize,
    pub span: Option<(NaiveDate, NaiveDate)>,
    pub last_close: Option<f64>,
    pub last_bar: Option<QuoteBar>,
    pub log_returns: usize,
    pub dropped_returns: usize,
}

impl QuoteSummary {
    /// Summarises a quote file.
    pub fn from_file(file: &QuoteFile) -> Self {
        let prices = PriceSeries::new(file.closes());
        let returns = LogReturnSeries::from_prices(&prices);
        Self {
            rows: file.len(),
            skipped_rows: file.skipped(),
            span: file.date_span(),
            last_close: prices.last(),
            last_bar: match file.quotes() {
                Quotes::Bars(bars) => bars.last().copied(),
                Quotes::Closes(_) => None,
            },
            log_returns: returns.len(),
            dropped_returns: returns.dropped(),
        }
    }

    /// Returns `true` if the series meets the minimums of `method`.
    pub fn supports(&self, method: EstimationMethod) -> bool {
        self.rows >= method.min_closes() && self.log_returns >= method.min_returns()
    }

    /// Renders the summary as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Rows:        {} ({} skipped)", self.rows, self.skipped_rows);
        match self.span {
            Some((first, last)) => {
                let _ = writeln!(out, "Dates:       {} .. {}", first, last);
            }
            None => {
                let _ = writeln!(out, "Dates:       (undated closes)");
            }
        }
        match (self.last_bar, self.last_close) {
            (Some(bar), _) => {
                let _ = writeln!(
                    out,
                    "Last bar:    {} O {:.4} H {:.4} L {:.4} C {:.4} V {}",
                    bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
                );
            }
            (None, Some(close)) => {
                let _ = writeln!(out, "Last close:  {:.4}", close);
            }
            (None, None) => {}
        }
        let _ = writeln!(
            out,
            "Log-returns: {} ({} dropped)",
            self.log_returns, self.dropped_returns
        );
        for method in [EstimationMethod::BlockBootstrap, EstimationMethod::Gbm] {
            let status = if self.supports(method) { "ok" } else { "insufficient" };
            let _ = writeln!(
                out,
                "  {:<16} {:<12} (needs {} closes)",
                method.as_str(),
                status,
                method.min_closes()
            );
        }
        out
    }
}

/// Run the check command
pub fn run(quotes: &Path, range: LookbackRange) -> Result<()> {
    info!("Checking quote file...");
    info!("  Quotes: {}", quotes.display());
    info!("  Range: {}", range);

    let file = load_quotes(quotes)?.restrict(range)?;
    print!("{}", QuoteSummary::from_file(&file).render());

    info!("Check complete");
    Ok(())
}
