//! Sample statistics used by the simulators.
//!
//! - `order_statistics`: linear-interpolated quantiles and medians
//! - `moments`: sample mean and standard deviation

pub mod moments;
pub mod order_statistics;

pub use moments::{mean, sample_std_dev};
pub use order_statistics::{fraction_where, median, quantile, quantile_sorted, sorted_copy};
