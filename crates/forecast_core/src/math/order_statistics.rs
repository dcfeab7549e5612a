//! Order statistics over unordered samples.
//!
//! Quantiles use linear interpolation between the two ranked elements
//! bracketing the fractional rank:
//!
//! ```text
//! pos   = (n - 1) * clamp(q, 0, 1)
//! lower = x[floor(pos)]
//! upper = x[floor(pos) + 1]   (or lower at the end of the sample)
//! Q(q)  = lower + (pos - floor(pos)) * (upper - lower)
//! ```
//!
//! Sorting is the only order-dependent step, so results depend only on the
//! multiset of values.

/// Returns an ascending copy of `sample`.
///
/// NaN values sort after every number under IEEE total ordering, so sorting
/// never panics.
pub fn sorted_copy(sample: &[f64]) -> Vec<f64> {
    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile `q` of an already ascending sample.
///
/// Use this when several quantiles of one sample are needed, to sort once.
/// An empty sample yields `0.0`.
///
/// # Examples
/// ```
/// use forecast_core::math::{quantile_sorted, sorted_copy};
///
/// let sorted = sorted_copy(&[4.0, 1.0, 3.0, 2.0]);
/// assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
/// assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
/// ```
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    // NaN q clamps to 0
    let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;

    let lower = sorted[base.min(sorted.len() - 1)];
    let upper = sorted.get(base + 1).copied().unwrap_or(lower);
    let out = lower + rest * (upper - lower);

    if out.is_finite() {
        out
    } else {
        lower
    }
}

/// Quantile `q` of an unordered sample.
///
/// `q` is clamped to `[0, 1]`. An empty sample yields `0.0`. If the
/// interpolation overflows, the lower ranked element is returned.
///
/// # Examples
/// ```
/// use forecast_core::math::quantile;
///
/// let sample = [10.0, 30.0, 20.0, 40.0, 50.0];
/// assert_eq!(quantile(&sample, 0.0), 10.0);
/// assert_eq!(quantile(&sample, 0.25), 20.0);
/// assert_eq!(quantile(&sample, 0.9), 46.0);
/// assert_eq!(quantile(&[], 0.5), 0.0);
/// ```
pub fn quantile(sample: &[f64], q: f64) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    quantile_sorted(&sorted_copy(sample), q)
}

/// Median of an unordered sample, i.e. `quantile(sample, 0.5)`.
#[inline]
pub fn median(sample: &[f64]) -> f64 {
    quantile(sample, 0.5)
}

/// Fraction of `sample` satisfying `predicate`; `0.0` for an empty sample.
pub fn fraction_where<F>(sample: &[f64], predicate: F) -> f64
where
    F: Fn(f64) -> bool,
{
    if sample.is_empty() {
        return 0.0;
    }
    let hits = sample.iter().filter(|&&x| predicate(x)).count();
    hits as f64 / sample.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quantile_empty() {
        assert_eq!(quantile(&[], 0.3), 0.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_quantile_single() {
        assert_eq!(quantile(&[7.5], 0.0), 7.5);
        assert_eq!(quantile(&[7.5], 0.42), 7.5);
        assert_eq!(quantile(&[7.5], 1.0), 7.5);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sample = [1.0, 2.0, 3.0, 4.0];
        // pos = 3 * 0.1 = 0.3
        assert_relative_eq!(quantile(&sample, 0.1), 1.3, epsilon = 1e-12);
        // pos = 3 * 0.9 = 2.7
        assert_relative_eq!(quantile(&sample, 0.9), 3.7, epsilon = 1e-12);
        assert_relative_eq!(median(&sample), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_clamps_q() {
        let sample = [5.0, 1.0, 3.0];
        assert_eq!(quantile(&sample, -0.5), 1.0);
        assert_eq!(quantile(&sample, 1.5), 5.0);
        assert_eq!(quantile(&sample, f64::NAN), 1.0);
    }

    #[test]
    fn test_quantile_overflow_falls_back_to_lower() {
        let sample = [-f64::MAX, f64::MAX];
        // upper - lower overflows to infinity
        assert_eq!(quantile(&sample, 0.5), -f64::MAX);
    }

    #[test]
    fn test_quantile_ties() {
        let sample = [2.0, 2.0, 2.0, 1.0];
        assert_eq!(median(&sample), 2.0);
        assert_eq!(quantile(&sample, 0.0), 1.0);
    }

    #[test]
    fn test_fraction_where() {
        let sample = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(fraction_where(&sample, |x| x > 2.0), 0.5);
        assert_relative_eq!(fraction_where(&sample, |x| x >= 1.0), 1.0);
        assert_eq!(fraction_where(&[], |_| true), 0.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn sample_strategy() -> impl Strategy<Value = Vec<f64>> {
            prop::collection::vec(-1.0e6..1.0e6_f64, 1..200)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_quantile_extremes_match_min_max(sample in sample_strategy()) {
                let min = sample.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = sample.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

                prop_assert_eq!(quantile(&sample, 0.0), min);
                prop_assert_eq!(quantile(&sample, 1.0), max);
                prop_assert_eq!(quantile(&sample, 0.5), median(&sample));
            }

            #[test]
            fn test_quantile_permutation_invariant(
                sample in sample_strategy(),
                q in 0.0..=1.0_f64,
            ) {
                let mut reversed = sample.clone();
                reversed.reverse();
                let mut rotated = sample.clone();
                rotated.rotate_left(sample.len() / 2);

                let expected = quantile(&sample, q);
                prop_assert_eq!(quantile(&reversed, q), expected);
                prop_assert_eq!(quantile(&rotated, q), expected);
            }

            #[test]
            fn test_quantile_monotone_in_q(
                sample in sample_strategy(),
                a in 0.0..=1.0_f64,
                b in 0.0..=1.0_f64,
            ) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(quantile(&sample, lo) <= quantile(&sample, hi) + 1e-9);
            }
        }
    }
}
