//! Quote file loading and look-back filtering.
//!
//! Two layouts are accepted:
//! - OHLCV bars: a header row, then `date,open,high,low,close,volume`
//! - a single column of closes, with or without a header
//!
//! Malformed rows are skipped and counted rather than failing the load.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::{CliError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl QuoteBar {
    /// Parses a `date,open,high,low,close,volume` record.
    ///
    /// Returns `None` for missing fields, unparseable or non-finite values,
    /// non-positive prices and negative volume.
    fn from_record(record: &csv::StringRecord) -> Option<Self> {
        if record.len() < 6 || record.iter().take(6).any(str::is_empty) {
            return None;
        }

        let date = NaiveDate::parse_from_str(&record[0], DATE_FORMAT).ok()?;
        let mut values = [0.0; 5];
        for (slot, field) in values.iter_mut().zip(record.iter().skip(1)) {
            *slot = field.parse::<f64>().ok().filter(|v| v.is_finite())?;
        }
        let [open, high, low, close, volume] = values;

        if open <= 0.0 || high <= 0.0 || low <= 0.0 || close <= 0.0 || volume < 0.0 {
            return None;
        }

        Some(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Parsed contents of a quote file.
#[derive(Debug, Clone, PartialEq)]
pub enum Quotes {
    /// Dated OHLCV bars, oldest first.
    Bars(Vec<QuoteBar>),
    /// Undated closes, in file order.
    Closes(Vec<f64>),
}

/// A loaded quote file together with the number of rows skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteFile {
    quotes: Quotes,
    skipped: usize,
}

impl QuoteFile {
    /// Parsed quotes.
    pub fn quotes(&self) -> &Quotes {
        &self.quotes
    }

    /// Number of usable rows.
    pub fn len(&self) -> usize {
        match &self.quotes {
            Quotes::Bars(bars) => bars.len(),
            Quotes::Closes(closes) => closes.len(),
        }
    }

    /// Rows skipped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        match &self.quotes {
            Quotes::Bars(bars) => bars.iter().map(|b| b.close).collect(),
            Quotes::Closes(closes) => closes.clone(),
        }
    }

    /// First and last bar dates, if the file is dated.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match &self.quotes {
            Quotes::Bars(bars) => Some((bars.first()?.date, bars.last()?.date)),
            Quotes::Closes(_) => None,
        }
    }

    /// Keeps only the bars inside `range`, counted back from the newest bar.
    ///
    /// Undated close files have no calendar to filter on and are returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NoQuotes`] if nothing is left after filtering.
    pub fn restrict(self, range: LookbackRange) -> Result<Self> {
        let cutoff = self.cutoff(range);
        match (self.quotes, cutoff) {
            (Quotes::Bars(bars), Some(cutoff)) => {
                let kept: Vec<QuoteBar> = bars.into_iter().filter(|b| b.date >= cutoff).collect();
                if kept.is_empty() {
                    return Err(CliError::no_quotes(format!("no data for range {}", range)));
                }

                debug!(range = %range, %cutoff, kept = kept.len(), "Applied look-back range");
                Ok(Self {
                    quotes: Quotes::Bars(kept),
                    skipped: self.skipped,
                })
            }
            (quotes, _) => {
                if range != LookbackRange::Max && matches!(quotes, Quotes::Closes(_)) {
                    warn!(range = %range, "Quote file has no dates; look-back range ignored");
                }
                Ok(Self {
                    quotes,
                    skipped: self.skipped,
                })
            }
        }
    }

    fn cutoff(&self, range: LookbackRange) -> Option<NaiveDate> {
        let days = range.days()?;
        let (_, newest) = self.date_span()?;
        newest.checked_sub_signed(Duration::days(days))
    }
}

/// Loads a quote file from disk.
///
/// # Errors
///
/// - [`CliError::FileNotFound`] if `path` does not exist
/// - [`CliError::NoQuotes`] if no row is usable
pub fn load_quotes(path: &Path) -> Result<QuoteFile> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    let quotes = parse_quotes(file)?;
    debug!(
        path = %path.display(),
        rows = quotes.len(),
        skipped = quotes.skipped(),
        "Loaded quote file"
    );
    Ok(quotes)
}

/// Parses quotes from any reader.
pub fn parse_quotes<R: Read>(reader: R) -> Result<QuoteFile> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    let mut closes = Vec::new();
    let mut single_column: Option<bool> = None;
    let mut skipped = 0;

    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let is_single = match single_column {
            Some(mode) => mode,
            None => {
                let mode = record.len() == 1;
                single_column = Some(mode);
                if is_header(&record, mode) {
                    continue;
                }
                mode
            }
        };

        if is_single {
            match record[0].parse::<f64>() {
                Ok(close) if close.is_finite() && close > 0.0 => closes.push(close),
                _ => skipped += 1,
            }
        } else {
            match QuoteBar::from_record(&record) {
                Some(bar) => bars.push(bar),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped malformed quote rows");
    }

    let quotes = if single_column == Some(true) {
        Quotes::Closes(closes)
    } else {
        bars.sort_by_key(|b| b.date);
        Quotes::Bars(bars)
    };

    let file = QuoteFile { quotes, skipped };
    if file.len() == 0 {
        return Err(CliError::no_quotes("unable to parse any quote rows"));
    }
    Ok(file)
}

/// A first row is a header when none of its value fields parse as numbers.
///
/// A dated row with an unreadable date but numeric prices is data and is
/// counted as skipped like any other malformed row.
fn is_header(record: &csv::StringRecord, single_column: bool) -> bool {
    if single_column {
        record[0].parse::<f64>().is_err()
    } else {
        !record.iter().skip(1).any(|field| field.parse::<f64>().is_ok())
    }
}

/// Look-back window applied to a quote file before forecasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LookbackRange {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl LookbackRange {
    /// Calendar days covered, or `None` for the whole history.
    pub fn days(&self) -> Option<i64> {
        match self {
            LookbackRange::OneMonth => Some(31),
            LookbackRange::ThreeMonths => Some(93),
            LookbackRange::SixMonths => Some(186),
            LookbackRange::OneYear => Some(366),
            LookbackRange::TwoYears => Some(365 * 2 + 1),
            LookbackRange::FiveYears => Some(365 * 5 + 1),
            LookbackRange::Max => None,
        }
    }

    /// Short tag as written on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackRange::OneMonth => "1m",
            LookbackRange::ThreeMonths => "3m",
            LookbackRange::SixMonths => "6m",
            LookbackRange::OneYear => "1y",
            LookbackRange::TwoYears => "2y",
            LookbackRange::FiveYears => "5y",
            LookbackRange::Max => "max",
        }
    }
}

impl FromStr for LookbackRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(LookbackRange::OneMonth),
            "3m" => Ok(LookbackRange::ThreeMonths),
            "6m" => Ok(LookbackRange::SixMonths),
            "1y" => Ok(LookbackRange::OneYear),
            "2y" => Ok(LookbackRange::TwoYears),
            "5y" => Ok(LookbackRange::FiveYears),
            "max" => Ok(LookbackRange::Max),
            _ => Err(ConfigError::InvalidRange(s.to_string())),
        }
    }
}

impl fmt::Display for LookbackRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
