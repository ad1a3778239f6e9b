//! Trading signals service module.
//!
//! Derives the indicator table from a bar series, detects chart patterns,
//! fuses rule evidence into a decision, and attaches risk levels.

pub mod engine;
pub mod fusion;
pub mod indicators;
pub mod patterns;
pub mod risk;
pub mod severity;
pub mod store;
pub mod validator;

pub use engine::{Analysis, SignalEngine};
pub use indicators::IndicatorTable;
pub use patterns::PatternDetector;
pub use store::SignalStore;

use crate::types::Bar;

/// Trait for implementing technical indicators.
///
/// Outputs are aligned with the input: index `i` only depends on bars
/// `0..=i`, and indices before the window fills are `None`.
pub trait Indicator: Send + Sync {
    /// Per-bar output of this indicator.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Minimum number of bars before the first defined value.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator over the whole series.
    fn calculate(&self, bars: &[Bar]) -> Self::Output;
}

/// Single-bar close-to-close change in percent.
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
