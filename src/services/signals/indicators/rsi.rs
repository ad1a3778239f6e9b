//! Relative Strength Index (RSI) indicator.

use crate::services::signals::Indicator;
use crate::types::Bar;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent
/// losses using Wilder smoothing. Values range from 0-100:
/// - Below the oversold threshold: potential buy signal
/// - Above the overbought threshold: potential sell signal
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Map smoothed averages to the 0-100 scale.
    ///
    /// A zero average loss saturates at 100; when gain is zero too the
    /// oscillator is undefined.
    pub fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                return None;
            }
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator for Rsi {
    type Output = Vec<Option<f64>>;

    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let mut out = vec![None; bars.len()];
        if self.period == 0 || bars.len() < self.period + 1 {
            return out;
        }

        let mut gains = Vec::with_capacity(bars.len() - 1);
        let mut losses = Vec::with_capacity(bars.len() - 1);

        for i in 1..bars.len() {
            let change = bars[i].close - bars[i - 1].close;
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let period = self.period as f64;

        // Calculate initial averages
        let mut avg_gain: f64 = gains.iter().take(self.period).sum::<f64>() / period;
        let mut avg_loss: f64 = losses.iter().take(self.period).sum::<f64>() / period;
        out[self.period] = Self::from_averages(avg_gain, avg_loss);

        // Change j belongs to bar j + 1
        for j in self.period..gains.len() {
            avg_gain = (avg_gain * (period - 1.0) + gains[j]) / period;
            avg_loss = (avg_loss * (period - 1.0) + losses[j]) / period;
            out[j + 1] = Self::from_averages(avg_gain, avg_loss);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_uptrend_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                Bar::new(1_000_000 + i as i64 * 60_000, base, base + 2.0, base - 1.0, base + 1.0, 1000.0)
            })
            .collect()
    }

    fn create_downtrend_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let base = 200.0 - i as f64 * 1.5;
                Bar::new(1_000_000 + i as i64 * 60_000, base, base + 1.0, base - 2.0, base - 1.0, 1000.0)
            })
            .collect()
    }

    fn create_flat_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| Bar::new(1_000_000 + i as i64 * 60_000, 100.0, 100.0, 100.0, 100.0, 1000.0))
            .collect()
    }

    fn create_zigzag_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let close = if i % 2 == 0 { 100.0 } else { 102.0 };
                Bar::new(1_000_000 + i as i64 * 60_000, close, close + 1.0, close - 1.0, close, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 15);
        assert_eq!(Rsi::new(21).min_periods(), 22);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::default().calculate(&create_uptrend_bars(10));
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_first_defined_index() {
        let rsi = Rsi::default().calculate(&create_zigzag_bars(30));
        assert!(rsi[13].is_none());
        assert!(rsi[14].is_some());
    }

    #[test]
    fn test_rsi_saturates_without_losses() {
        let rsi = Rsi::default().calculate(&create_uptrend_bars(50));
        assert_eq!(rsi[49], Some(100.0));
    }

    #[test]
    fn test_rsi_downtrend_low_value() {
        let rsi = Rsi::default().calculate(&create_downtrend_bars(50));
        let value = rsi[49].unwrap();
        assert!(value < 50.0, "RSI in downtrend should be < 50, got {}", value);
    }

    #[test]
    fn test_rsi_flat_series_undefined() {
        let rsi = Rsi::default().calculate(&create_flat_bars(60));
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_zigzag_near_neutral() {
        let rsi = Rsi::default().calculate(&create_zigzag_bars(60));
        let value = rsi[59].unwrap();
        assert!((0.0..=100.0).contains(&value));
        assert!((value - 50.0).abs() < 10.0, "got {}", value);
    }

    #[test]
    fn test_rsi_from_averages_edges() {
        assert_eq!(Rsi::from_averages(0.0, 0.0), None);
        assert_eq!(Rsi::from_averages(1.0, 0.0), Some(100.0));
        assert_eq!(Rsi::from_averages(0.0, 1.0), Some(0.0));
        assert_eq!(Rsi::from_averages(1.0, 1.0), Some(50.0));
    }
}
