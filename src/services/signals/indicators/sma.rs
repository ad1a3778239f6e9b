//! Simple Moving Average (SMA) indicator.

use crate::services::signals::Indicator;
use crate::types::Bar;

/// SMA (Simple Moving Average) indicator.
///
/// Calculates the average close over a trailing window.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Rolling mean of any series.
    pub fn rolling(values: &[f64], period: usize) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if period == 0 || values.len() < period {
            return out;
        }

        // Each window is summed directly, no running total.
        for i in (period - 1)..values.len() {
            let window = &values[i + 1 - period..=i];
            out[i] = Some(window.iter().sum::<f64>() / period as f64);
        }

        out
    }
}

impl Indicator for Sma {
    type Output = Vec<Option<f64>>;

    fn id(&self) -> &str {
        "sma"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Self::rolling(&closes, self.period)
    }
}
