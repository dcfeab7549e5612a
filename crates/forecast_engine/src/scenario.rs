//! Scenario classification from aggregate horizon statistics.

use forecast_core::types::ScenarioLabel;

/// Minimum rise probability for a bullish outlook.
pub const BULL_MIN_PROBABILITY: f64 = 0.60;

/// 5th-percentile return a bullish outlook must stay above.
pub const BULL_VAR5_FLOOR: f64 = -0.06;

/// Rise probability at or below which the outlook is bearish.
pub const BEAR_MAX_PROBABILITY: f64 = 0.45;

/// 5th-percentile return at or below which the outlook is bearish.
pub const BEAR_VAR5_CEILING: f64 = -0.10;

/// Classifies a horizon as bull, base or bear.
///
/// Rules are checked in order:
/// 1. `Bull` if `p_rise >= 0.60`, `median_return > 0` and `var5 > -0.06`
/// 2. `Bear` if `p_rise <= 0.45` or `var5 <= -0.10`
/// 3. `Base` otherwise
///
/// # Examples
///
/// ```rust
/// use forecast_core::types::ScenarioLabel;
/// use forecast_engine::scenario::classify;
///
/// assert_eq!(classify(0.65, 0.02, -0.03), ScenarioLabel::Bull);
/// assert_eq!(classify(0.40, -0.01, -0.02), ScenarioLabel::Bear);
/// assert_eq!(classify(0.50, 0.00, -0.02), ScenarioLabel::Base);
/// ```
pub fn classify(p_rise: f64, median_return: f64, var5: f64) -> ScenarioLabel {
    if p_rise >= BULL_MIN_PROBABILITY && median_return > 0.0 && var5 > BULL_VAR5_FLOOR {
        return ScenarioLabel::Bull;
    }
    if p_rise <= BEAR_MAX_PROBABILITY || var5 <= BEAR_VAR5_CEILING {
        return ScenarioLabel::Bear;
    }
    ScenarioLabel::Base
}
