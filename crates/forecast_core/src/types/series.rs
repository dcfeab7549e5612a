//! Closing-price and log-return series.
//!
//! [`PriceSeries`] is the immutable input to a forecast. [`LogReturnSeries`]
//! is derived from it once per call and never mutated afterwards.

/// Chronological sequence of daily closing prices.
///
/// The engine never mutates a series it receives; there are no mutable
/// accessors. Corrupt points (non-finite or non-positive) are tolerated here
/// and skipped when log-returns are derived.
///
/// # Examples
/// ```
/// use forecast_core::types::PriceSeries;
///
/// let prices = PriceSeries::new(vec![10.0, 10.5, 11.0]);
/// assert_eq!(prices.len(), 3);
/// assert_eq!(prices.last(), Some(11.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Wraps a chronological list of closes.
    pub fn new(closes: Vec<f64>) -> Self {
        Self { closes }
    }

    /// Number of closes, including corrupt points.
    #[inline]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Returns `true` when the series holds no closes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close, if any.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Read-only view of the closes.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.closes
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(closes: Vec<f64>) -> Self {
        Self::new(closes)
    }
}

impl FromIterator<f64> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Finite log-returns derived from a [`PriceSeries`].
///
/// Every element equals `ln(p[i] / p[i-1])` for an adjacent pair where both
/// prices are positive and finite. Pairs failing that test, or producing a
/// non-finite ratio, are skipped and counted in [`dropped`](Self::dropped).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogReturnSeries {
    values: Vec<f64>,
    dropped: usize,
}

impl LogReturnSeries {
    /// Derives log-returns from adjacent close pairs.
    ///
    /// # Examples
    /// ```
    /// use forecast_core::types::{LogReturnSeries, PriceSeries};
    ///
    /// let prices = PriceSeries::new(vec![100.0, f64::NAN, 110.0, 121.0]);
    /// let returns = LogReturnSeries::from_prices(&prices);
    ///
    /// // (100, NaN) and (NaN, 110) are skipped
    /// assert_eq!(returns.len(), 1);
    /// assert_eq!(returns.dropped(), 2);
    /// assert!((returns.as_slice()[0] - 1.1_f64.ln()).abs() < 1e-12);
    /// ```
    pub fn from_prices(prices: &PriceSeries) -> Self {
        let closes = prices.as_slice();
        let mut values = Vec::with_capacity(closes.len().saturating_sub(1));
        let mut dropped = 0;

        for pair in closes.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            if !is_finite_positive(prev) || !is_finite_positive(cur) {
                dropped += 1;
                continue;
            }

            let r = (cur / prev).ln();
            if r.is_finite() {
                values.push(r);
            } else {
                dropped += 1;
            }
        }

        Self { values, dropped }
    }

    /// Number of usable returns.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no usable return survived filtering.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of adjacent pairs skipped as corrupt.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Read-only view of the returns.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// `true` for finite values strictly above zero.
#[inline]
pub fn is_finite_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
