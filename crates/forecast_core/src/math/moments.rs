//! Sample moments.

/// Arithmetic mean, or `None` for an empty sample.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation with an `n - 1` denominator.
///
/// A single observation has zero spread (the denominator is floored at one)
/// and negative variance from rounding is floored at zero. Returns `None`
/// for an empty sample.
pub fn sample_std_dev(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    let ss = data.iter().map(|x| (x - m) * (x - m)).sum::<f64>();
    let variance = ss / (data.len().saturating_sub(1)).max(1) as f64;
    Some(variance.max(0.0).sqrt())
}
